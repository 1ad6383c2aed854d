//! OCR engine backed by the `tesseract` command line tool
//!
//! The region is piped to the process as PNG on stdin and the text is read
//! from stdout, so no temporary files are involved.

use super::OcrEngine;
use super::error::{OcrError, OcrResult};
use super::types::{CharacterPolicy, OcrConfig};
use image::{GrayImage, ImageFormat};
use std::io::{Cursor, Write};
use std::process::{Child, Command, Stdio};

const ENGINE_NAME: &str = "tesseract/cli";

pub struct TesseractCli {
    config: OcrConfig,
}

impl TesseractCli {
    /// Check that the binary runs and remember the configuration
    pub fn new(config: OcrConfig) -> OcrResult<Self> {
        config
            .validate()
            .map_err(|_| OcrError::InvalidLanguage {
                languages: format!("{}, {}", config.number_languages, config.name_languages),
            })?;

        let output = Command::new(&config.binary)
            .arg("--version")
            .output()
            .map_err(|e| OcrError::EngineUnavailable {
                engine: ENGINE_NAME.to_string(),
                description: format!("failed to run {:?} (is it installed?): {e}", config.binary),
            })?;
        if !output.status.success() {
            return Err(OcrError::EngineUnavailable {
                engine: ENGINE_NAME.to_string(),
                description: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        let version = String::from_utf8_lossy(banner);
        log::debug!(
            "🔤 Using {}",
            version.lines().next().unwrap_or("tesseract").trim()
        );

        Ok(Self { config })
    }

    /// Arguments after the program name for one recognition call
    pub fn command_args(&self, policy: CharacterPolicy) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.config.languages_for(policy).to_string(),
        ];
        if let Some(dir) = &self.config.tessdata_dir {
            args.push("--tessdata-dir".to_string());
            args.push(dir.to_string_lossy().to_string());
        }
        if let Some(psm) = self.config.page_segmentation {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        if let Some(whitelist) = policy.whitelist() {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={whitelist}"));
        }
        args
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn recognize_text(&mut self, image: &GrayImage, policy: CharacterPolicy) -> OcrResult<String> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut child = Command::new(&self.config.binary)
            .args(self.command_args(policy))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        write_input(&mut child, &png)?;
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                engine: ENGINE_NAME.to_string(),
                description: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Pipe `input` to the child's stdin and close it. On a failed write the
/// child is killed and reaped before the error is returned.
fn write_input(child: &mut Child, input: &[u8]) -> OcrResult<()> {
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    if let Err(e) = stdin.write_all(input) {
        drop(stdin);
        let _ = child.kill();
        let _ = child.wait();
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn engine(config: OcrConfig) -> TesseractCli {
        TesseractCli { config }
    }

    #[test]
    fn test_digit_args_carry_whitelist() {
        let args = engine(OcrConfig::default()).command_args(CharacterPolicy::DigitsAndComma);
        assert_eq!(
            args,
            vec![
                "stdin",
                "stdout",
                "-l",
                "eng",
                "-c",
                "tessedit_char_whitelist=0123456789,"
            ]
        );
    }

    #[test]
    fn test_name_args_use_mixed_languages() {
        let config = OcrConfig {
            tessdata_dir: Some(PathBuf::from("/usr/share/tessdata")),
            page_segmentation: Some(7),
            ..OcrConfig::default()
        };
        let args = engine(config).command_args(CharacterPolicy::Unrestricted);
        assert_eq!(
            args,
            vec![
                "stdin",
                "stdout",
                "-l",
                "jpn+eng",
                "--tessdata-dir",
                "/usr/share/tessdata",
                "--psm",
                "7"
            ]
        );
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let config = OcrConfig {
            binary: PathBuf::from("definitely-not-a-tesseract-binary"),
            ..OcrConfig::default()
        };
        match TesseractCli::new(config) {
            Err(OcrError::EngineUnavailable { engine, .. }) => assert_eq!(engine, ENGINE_NAME),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("binary should not exist"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_reaps_child() {
        // `true` exits without reading, so a payload larger than the pipe buffer cannot be written
        let mut child = Command::new("true")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let payload = vec![0u8; 4 * 1024 * 1024];

        let result = write_input(&mut child, &payload);

        assert!(matches!(result, Err(OcrError::Io { .. })));
        assert!(child.stdin.is_none());
        assert!(child.try_wait().unwrap().is_some());
    }
}
