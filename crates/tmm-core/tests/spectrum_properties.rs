use num_complex::Complex64;
use std::f64::consts::TAU;
use std::fs;
use tempfile::TempDir;
use tmm_core::modules::angle::LayerAngle;
use tmm_core::modules::coefficients::{reflectance, transmittance};
use tmm_core::modules::composer::compose;
use tmm_core::modules::serialization::{ColumnarTableSink, render_spectrum_table};
use tmm_core::{
    DriverPhase, ExecutionMode, IndexSample, Layer, PhysicalConstants, Polarization,
    SpectrumDriver, Stack, SweepConfig, TmmErrorCategory, compute_spectrum, load_sweep_config,
    sweep,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tabulated(material: &str, thickness: f64, grid: &[f64], n: f64, k: f64) -> Layer {
    let samples: Vec<IndexSample> = grid
        .iter()
        .map(|&wavelength| IndexSample::new(wavelength, n, k))
        .collect();
    Layer::with_samples(material, thickness, &samples).expect("samples should load")
}

fn medium(material: &str, n: f64) -> Layer {
    Layer::with_constant_index(material, 0.0, n, 0.0)
}

#[test]
fn thin_film_matches_closed_form_airy_sum() {
    let wavelength = 1.0e-6;
    let (n0, n1, n2, d) = (1.0, 1.4, 1.0, 1.0e-7);
    let stack = Stack::from_parts(
        medium("air", n0),
        vec![tabulated("film", d, &[wavelength], n1, 0.0)],
        medium("air", n2),
    )
    .expect("stack");

    let spectrum = compute_spectrum(&stack, Polarization::S).expect("spectrum");

    let r01 = (n0 - n1) / (n0 + n1);
    let r12 = (n1 - n2) / (n1 + n2);
    let delta = TAU * n1 * d / wavelength;
    let round_trip = Complex64::from_polar(1.0, 2.0 * delta);
    let r = (r01 + r12 * round_trip) / (1.0 + r01 * r12 * round_trip);
    let expected_r = r.norm_sqr();

    assert!((spectrum.reflectance[0] - expected_r).abs() < 1.0e-6);
    assert!((spectrum.transmittance[0] - (1.0 - expected_r)).abs() < 1.0e-6);
    assert!((spectrum.reflection_amplitudes[0].norm() - r.norm()).abs() < 1.0e-6);
}

#[test]
fn two_matrix_chain_reduces_to_single_interface_fresnel() {
    for (n0, ns) in [(1.0, 1.5), (1.33, 2.4), (3.5, 1.0)] {
        let d0 = Layer::dynamical_matrix(Complex64::new(n0, 0.0), LayerAngle::NORMAL).s;
        let ds = Layer::dynamical_matrix(Complex64::new(ns, 0.0), LayerAngle::NORMAL).s;
        let transfer = compose(&[d0.inverse().expect("invertible"), ds]).expect("compose");

        let (r_power, _) = reflectance(&transfer).expect("reflectance");
        let (t_power, _) = transmittance(&transfer).expect("transmittance");
        let expected = ((n0 - ns) / (n0 + ns)).powi(2);
        assert!((r_power - expected).abs() < 1.0e-14);
        assert!((r_power + t_power - 1.0).abs() < 1.0e-14);
    }
}

#[test]
fn lossless_oblique_incidence_conserves_energy_for_both_polarizations() {
    let grid = [4.2e-7, 5.1e-7, 6.3e-7, 7.7e-7];
    let stack = Stack::from_parts(
        medium("air", 1.0),
        vec![
            tabulated("Ta2O5", 8.0e-8, &grid, 2.1, 0.0),
            tabulated("SiO2", 1.2e-7, &grid, 1.46, 0.0),
            tabulated("Ta2O5", 8.0e-8, &grid, 2.1, 0.0),
        ],
        medium("glass", 1.52),
    )
    .expect("stack");

    for theta in [0.2, 0.6, 1.2] {
        for polarization in [Polarization::S, Polarization::P] {
            let config = SweepConfig::new(polarization).with_incidence_angle(theta);
            let spectrum = sweep(&stack, &config, &PhysicalConstants::SI).expect("spectrum");
            for (sample, (r, t)) in spectrum
                .reflectance
                .iter()
                .zip(&spectrum.transmittance)
                .enumerate()
            {
                assert!(
                    (r + t - 1.0).abs() < 1.0e-9,
                    "theta={theta} pol={polarization} sample={sample} R+T={}",
                    r + t
                );
            }
        }
    }
}

#[test]
fn total_internal_reflection_past_critical_angle() {
    let grid = [5.0e-7, 6.0e-7];
    let stack = Stack::from_parts(
        medium("glass", 1.5),
        vec![tabulated("gap", 1.0e-6, &grid, 1.0, 0.0)],
        medium("air", 1.0),
    )
    .expect("stack");

    for polarization in [Polarization::S, Polarization::P] {
        let config = SweepConfig::new(polarization).with_incidence_angle(1.0);
        let spectrum = sweep(&stack, &config, &PhysicalConstants::SI).expect("spectrum");
        for (r, t) in spectrum.reflectance.iter().zip(&spectrum.transmittance) {
            assert!((r - 1.0).abs() < 1.0e-9);
            assert!(t.abs() < 1.0e-9);
        }
    }
}

#[test]
fn zero_thickness_layer_contributes_identity_phase() {
    let layer = tabulated("ghost", 0.0, &[5.0e-7], 2.0, 0.5);
    let propagation = layer.propagation_matrix(Complex64::new(3.0e7, 1.0e6));
    assert_eq!(propagation, tmm_core::Matrix2::IDENTITY);
}

#[test]
fn stack_mutation_requires_a_fresh_sweep() {
    init_logging();
    let grid = [5.0e-7, 6.0e-7, 7.0e-7];
    let stack = Stack::from_parts(
        medium("air", 1.0),
        vec![tabulated("ZnS", 6.0e-8, &grid, 2.35, 0.0)],
        tabulated("glass", 0.0, &grid, 1.52, 0.0),
    )
    .expect("stack");

    let mut driver = SpectrumDriver::new(stack, SweepConfig::new(Polarization::S));
    let before = driver.compute().expect("first sweep").clone();

    driver.stack_mut().interior_mut()[0]
        .load_samples(&[IndexSample::new(5.0e-7, 2.35, 0.0)])
        .expect("shorter column still loads");
    assert_eq!(driver.phase(), DriverPhase::Uninitialized);

    let error = driver.compute().expect_err("film and substrate disagree on sample count");
    assert_eq!(error.placeholder(), "CONFIG.SAMPLE_COUNT");
    assert_eq!(error.category(), TmmErrorCategory::ConfigurationError);
    assert!(driver.spectrum().is_none());

    driver.stack_mut().interior_mut()[0]
        .load_samples(
            &grid
                .iter()
                .map(|&wavelength| IndexSample::new(wavelength, 2.35, 0.0))
                .collect::<Vec<_>>(),
        )
        .expect("full column loads");
    let after = driver.compute().expect("second sweep");
    assert_eq!(&before, after);
}

#[test]
fn sweep_configured_from_json_file_renders_a_table() {
    init_logging();
    let temp = TempDir::new().expect("tempdir should be created");
    let path = temp.path().join("sweep.json");
    fs::write(
        &path,
        r#"{"polarization": "p", "incidenceAngle": 0.5, "executionMode": "parallel"}"#,
    )
    .expect("config should be written");

    let config = load_sweep_config(&path).expect("config should load");
    assert_eq!(config.execution_mode, ExecutionMode::Parallel);

    let grid = [4.5e-7, 5.5e-7, 6.5e-7];
    let stack = Stack::from_parts(
        medium("air", 1.0),
        vec![tabulated("MgF2", 1.0e-7, &grid, 1.38, 0.0)],
        medium("glass", 1.52),
    )
    .expect("stack");

    let mut driver = SpectrumDriver::new(stack, config);
    let spectrum = driver.compute().expect("sweep").clone();
    assert_eq!(spectrum.polarization, Polarization::P);

    let mut sink = ColumnarTableSink::new();
    spectrum.emit(&mut sink).expect("infallible");
    let table = sink.into_table();
    assert_eq!(table, render_spectrum_table(&spectrum));
    assert_eq!(table.lines().count(), grid.len() + 1);
}
