use std::convert::Infallible;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::modules::spectrum::Spectrum;
use crate::modules::traits::SpectrumSink;

const COLUMN_WIDTH: usize = 16;
const COLUMN_PRECISION: usize = 8;

pub fn format_scientific_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$e}",
        width = width,
        precision = precision
    )
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

fn render_columns(wavelengths: &[f64], reflectance: &[f64], transmittance: &[f64]) -> String {
    let mut table = format!(
        "#{:>w0$}{:>w$}{:>w$}\n",
        "wavelength_m",
        "R",
        "T",
        w0 = COLUMN_WIDTH - 1,
        w = COLUMN_WIDTH
    );
    for ((&wavelength, &r), &t) in wavelengths.iter().zip(reflectance).zip(transmittance) {
        let _ = writeln!(
            table,
            "{}{}{}",
            format_scientific_f64(wavelength, COLUMN_WIDTH, COLUMN_PRECISION),
            format_scientific_f64(r, COLUMN_WIDTH, COLUMN_PRECISION),
            format_scientific_f64(t, COLUMN_WIDTH, COLUMN_PRECISION)
        );
    }
    table
}

/// Fixed-width `wavelength R T` table with a `#` header line.
pub fn render_spectrum_table(spectrum: &Spectrum) -> String {
    render_columns(
        &spectrum.wavelengths,
        &spectrum.reflectance,
        &spectrum.transmittance,
    )
}

pub fn write_spectrum_table(path: &Path, spectrum: &Spectrum) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(&render_spectrum_table(spectrum)))
}

pub fn spectrum_to_json(spectrum: &Spectrum) -> serde_json::Result<String> {
    serde_json::to_string_pretty(spectrum)
}

/// Collects emitted columns into the same text layout as `render_spectrum_table`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnarTableSink {
    table: String,
}

impl ColumnarTableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn into_table(self) -> String {
        self.table
    }
}

impl SpectrumSink for ColumnarTableSink {
    type Error = Infallible;

    fn consume(
        &mut self,
        wavelengths: &[f64],
        reflectance: &[f64],
        transmittance: &[f64],
    ) -> Result<(), Self::Error> {
        self.table = render_columns(wavelengths, reflectance, transmittance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ColumnarTableSink, format_scientific_f64, normalize_text_artifact, render_spectrum_table,
        spectrum_to_json, write_spectrum_table,
    };
    use crate::domain::Polarization;
    use crate::modules::spectrum::Spectrum;
    use num_complex::Complex64;
    use std::fs;
    use tempfile::TempDir;

    fn two_sample_spectrum() -> Spectrum {
        Spectrum {
            polarization: Polarization::S,
            incidence_angle: 0.0,
            wavelengths: vec![5.0e-7, 6.0e-7],
            reflectance: vec![0.04, 0.25],
            transmittance: vec![0.96, 0.75],
            reflection_amplitudes: vec![Complex64::new(-0.2, 0.0), Complex64::new(0.0, 0.5)],
            transmission_amplitudes: vec![Complex64::new(0.8, 0.0), Complex64::new(0.5, 0.0)],
            violations: Vec::new(),
        }
    }

    #[test]
    fn scientific_formatting_is_fixed_width() {
        assert_eq!(format_scientific_f64(0.04, 16, 8), "   4.00000000e-2");
        assert_eq!(format_scientific_f64(5.0e-7, 16, 8).len(), 16);
    }

    #[test]
    fn table_has_header_and_one_row_per_sample() {
        let table = render_spectrum_table(&two_sample_spectrum());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('#'));
        assert!(lines[0].contains("wavelength_m"));
        assert_eq!(lines[0].len(), lines[1].len());

        let row: Vec<f64> = lines[2]
            .split_whitespace()
            .map(|field| field.parse().expect("numeric column"))
            .collect();
        assert_eq!(row, vec![6.0e-7, 0.25, 0.75]);
    }

    #[test]
    fn sink_output_matches_rendered_table() {
        let spectrum = two_sample_spectrum();
        let mut sink = ColumnarTableSink::new();
        spectrum.emit(&mut sink).expect("infallible");
        assert_eq!(sink.table(), render_spectrum_table(&spectrum));
    }

    #[test]
    fn repeated_table_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("spectrum.dat");
        let spectrum = two_sample_spectrum();

        write_spectrum_table(&path, &spectrum).expect("first write should succeed");
        let first = fs::read(&path).expect("table should be readable");
        write_spectrum_table(&path, &spectrum).expect("second write should succeed");
        let second = fs::read(&path).expect("table should be readable");

        assert_eq!(first, second);
        assert!(second.ends_with(b"\n"));
        assert!(!second.contains(&b'\r'));
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        assert_eq!(normalize_text_artifact("a\r\nb\rc"), "a\nb\nc\n");
        assert_eq!(normalize_text_artifact(""), "");
    }

    #[test]
    fn json_rendering_uses_camel_case_keys() {
        let json = spectrum_to_json(&two_sample_spectrum()).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["polarization"], "s");
        assert_eq!(value["incidenceAngle"], 0.0);
        assert_eq!(value["reflectance"][1], 0.25);
        assert_eq!(value["reflectionAmplitudes"][1][1], 0.5);
        assert!(value["violations"].as_array().expect("array").is_empty());
    }
}
