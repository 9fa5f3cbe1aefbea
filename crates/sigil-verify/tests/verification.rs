//! End-to-end verification tests on synthetic signatures.
//!
//! Each signer has a "style": a frequency and phase per channel. Genuine
//! samples follow the style with a random time warp, length, and noise;
//! forgeries imitate it with shifted phases.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sigil_dtw::{BarycenterMode, ChannelLengthPolicy};
use sigil_verify::{
    Channel, ErrorRate, FirstNSampler, LsDtwClassifier, LsDtwConfig, Origin, Sample, Sampler,
    SignerModel, ThresholdStrategy, VerifyError, equal_error_rate,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Style {
    freq: [f64; 7],
    phase: [f64; 7],
}

fn style(rng: &mut ChaCha8Rng) -> Style {
    let mut freq = [0.0; 7];
    let mut phase = [0.0; 7];
    for k in 0..7 {
        freq[k] = rng.gen_range(0.5..2.5);
        phase[k] = rng.gen_range(0.0..TAU);
    }
    Style { freq, phase }
}

fn forger_of(style: &Style) -> Style {
    let mut phase = style.phase;
    for p in &mut phase {
        *p += 1.2;
    }
    Style {
        freq: style.freq,
        phase,
    }
}

fn signature(rng: &mut ChaCha8Rng, style: &Style, id: &str, origin: Origin) -> Sample {
    let len = rng.gen_range(40..50);
    let warp = rng.gen_range(-0.15..0.15);
    let mut sample = Sample::new(id, "signer-1", origin);
    for (k, channel) in Channel::ALL.into_iter().enumerate() {
        let values: Vec<f64> = (0..len)
            .map(|i| {
                let t = i as f64 / (len - 1) as f64;
                let warped = t + warp * t * (1.0 - t);
                let noise = (rng.r#gen::<f64>() - 0.5) * 0.05;
                (TAU * style.freq[k] * warped + style.phase[k]).sin() + noise
            })
            .collect();
        sample = sample.with_channel(channel, values);
    }
    sample
}

/// 15 genuine samples followed by 5 forgeries.
fn signer_samples(seed: u64) -> Vec<Sample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let genuine_style = style(&mut rng);
    let forger_style = forger_of(&genuine_style);
    let mut samples: Vec<Sample> = (0..15)
        .map(|i| signature(&mut rng, &genuine_style, &format!("g{i}"), Origin::Genuine))
        .collect();
    samples.extend((0..5).map(|i| signature(&mut rng, &forger_style, &format!("f{i}"), Origin::Forged)));
    samples
}

// ---------------------------------------------------------------------------
// a) references are accepted by their own model
// ---------------------------------------------------------------------------

#[test]
fn references_accepted_under_max_reference_threshold() {
    let samples = signer_samples(1);
    let classifier =
        LsDtwClassifier::new(LsDtwConfig::default().with_threshold(ThresholdStrategy::MaxReference));
    let sampler = FirstNSampler::default();
    let model = classifier.train(&samples, &sampler).unwrap();

    assert!(matches!(model, SignerModel::Simple(_)));
    assert_eq!(model.channels(), &Channel::ALL);
    assert_eq!(model.stability().len(), model.template().len());

    for reference in sampler.partition(&samples).references {
        let decision = classifier.test(&model, reference).unwrap();
        assert!(decision.accepted, "{} rejected: {decision:?}", reference.id());
    }
}

// ---------------------------------------------------------------------------
// b) equal-error-rate calibration
// ---------------------------------------------------------------------------

#[test]
fn equal_error_rate_on_separable_distances() {
    let eer = equal_error_rate(&[1.0, 2.0, 3.0], &[5.0, 6.0, 7.0]).unwrap();
    assert!(eer.threshold > 3.0 && eer.threshold <= 5.0);
    assert_eq!(eer.rate, ErrorRate { far: 0.0, frr: 0.0 });
}

#[test]
fn calibrated_model_matches_its_own_decisions() {
    let samples = signer_samples(2);
    let classifier = LsDtwClassifier::default();
    let model = classifier.train(&samples, &FirstNSampler::default()).unwrap();
    let calibrated = model.as_calibrated().expect("equal error rate is the default");

    assert_eq!(calibrated.reference_distances().len(), 10);
    assert_eq!(calibrated.evaluation_distances().len(), 10);

    let mut genuine = Vec::new();
    let mut forged = Vec::new();
    for entry in calibrated.evaluation_distances() {
        let sample = samples.iter().find(|s| s.id() == entry.sample_id).unwrap();
        let decision = classifier.test(&model, sample).unwrap();
        assert_eq!(decision.distance, entry.distance);
        assert_eq!(decision.threshold, model.threshold());
        match entry.origin {
            Origin::Genuine => genuine.push(decision.distance),
            Origin::Forged => forged.push(decision.distance),
            Origin::Unknown => unreachable!(),
        }
    }

    let recomputed = ErrorRate::at_threshold(model.threshold(), &genuine, &forged);
    assert_eq!(recomputed, calibrated.error_rate());

    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    assert!(mean(&genuine) < mean(&forged));
}

// ---------------------------------------------------------------------------
// c) determinism and persistence
// ---------------------------------------------------------------------------

#[test]
fn training_is_deterministic() {
    let samples = signer_samples(3);
    let classifier = LsDtwClassifier::default();
    let a = classifier.train(&samples, &FirstNSampler::default()).unwrap();
    let b = classifier.train(&samples, &FirstNSampler::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn saved_model_verifies_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("signer-1.bin");
    let samples = signer_samples(4);
    let classifier = LsDtwClassifier::default();
    let model = classifier.train(&samples, &FirstNSampler::default()).unwrap();

    model.save(&path).unwrap();
    let loaded = SignerModel::load(&path).unwrap();

    for sample in &samples {
        assert_eq!(
            classifier.test(&model, sample).unwrap(),
            classifier.test(&loaded, sample).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// d) configuration variants
// ---------------------------------------------------------------------------

#[test]
fn both_barycenter_modes_train() {
    let samples = signer_samples(5);
    for mode in [BarycenterMode::Joint, BarycenterMode::PerChannel] {
        let classifier = LsDtwClassifier::new(
            LsDtwConfig::default()
                .with_barycenter_mode(mode)
                .with_threshold(ThresholdStrategy::MeanPlusStd { k: 2.0 }),
        );
        let model = classifier.train(&samples, &FirstNSampler::default()).unwrap();
        assert!(model.threshold().is_finite() && model.threshold() >= 0.0);
    }
}

#[test]
fn short_derived_channel_needs_repeat_last_policy() {
    let mut samples = signer_samples(6);
    // Drop the last sample of one derived channel on the first reference.
    let first = samples.remove(0);
    let mut curvature = first.channel(Channel::LogCurvatureRadius).unwrap().to_vec();
    curvature.pop();
    samples.insert(0, first.with_channel(Channel::LogCurvatureRadius, curvature));

    let strict = LsDtwClassifier::new(LsDtwConfig::default().with_threshold(ThresholdStrategy::Mean));
    let err = strict.train(&samples, &FirstNSampler::default()).unwrap_err();
    assert!(matches!(err, VerifyError::Dtw(_)));

    let lenient = LsDtwClassifier::new(
        LsDtwConfig::default()
            .with_threshold(ThresholdStrategy::Mean)
            .with_length_policy(ChannelLengthPolicy::RepeatLast),
    );
    assert!(lenient.train(&samples, &FirstNSampler::default()).is_ok());
}
