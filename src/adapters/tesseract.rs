//! Tesseract CLI backend
//!
//! Runs `tesseract <png> stdout --oem 3 --psm 6 tsv` and reads the TSV rows.

use image::{GrayImage, ImageFormat};
use std::collections::BTreeMap;
use std::process::Command;
use tracing::debug;

use super::OcrEngine;
use crate::error::{Error, Result};
use crate::types::OcrOutput;

/// TSV column holding the confidence
const COL_CONF: usize = 10;
/// TSV column holding the token text
const COL_TEXT: usize = 11;

/// OCR through the `tesseract` binary
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
    args: Vec<String>,
}

impl TesseractOcr {
    /// LSTM engine, single uniform block of text
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: ["--oem", "3", "--psm", "6"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &GrayImage) -> Result<OcrOutput> {
        let file = tempfile::Builder::new().suffix(".png").tempfile()?;
        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| Error::Ocr(format!("cannot write OCR input: {}", e)))?;

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .args(&self.args)
            .arg("tsv")
            .output()
            .map_err(|e| Error::Ocr(format!("cannot run {}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(Error::Ocr(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_tsv(&tsv);
        debug!(tokens = parsed.tokens.len(), "tesseract finished");
        Ok(parsed)
    }
}

/// Parse tesseract TSV output
///
/// Every data row contributes one confidence and one token (blank for
/// page/block/line rows, which carry confidence -1). The full text is
/// rebuilt from word rows, one output line per (block, paragraph, line).
pub fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut confidences = Vec::new();
    let mut tokens = Vec::new();
    let mut lines: BTreeMap<(u32, u32, u32, u32), Vec<String>> = BTreeMap::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() <= COL_CONF {
            continue;
        }
        let conf = cols[COL_CONF].trim().parse::<f64>().map(|c| c as i32).unwrap_or(-1);
        let text = cols.get(COL_TEXT).map(|t| t.trim()).unwrap_or("");

        confidences.push(conf);
        tokens.push(text.to_string());

        if !text.is_empty() {
            let key = (num(cols[1]), num(cols[2]), num(cols[3]), num(cols[4]));
            lines.entry(key).or_default().push(text.to_string());
        }
    }

    let text = lines
        .values()
        .map(|words| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    OcrOutput {
        text,
        confidences,
        tokens,
    }
}

fn num(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}
