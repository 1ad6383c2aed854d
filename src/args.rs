use std::env;
use std::path::PathBuf;

pub const DEFAULT_INPUT_DIR: &str = "ScreenShot";
pub const DEFAULT_TEMPLATE_DIR: &str = "Templates";
pub const DEFAULT_OUTPUT_DIR: &str = "DebugImages";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub input_dir: PathBuf,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub tessdata_dir: Option<PathBuf>,
    pub workers: Option<usize>,
    pub config_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub full_frame: bool,
    pub debug_mode: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tessdata_dir: None,
            workers: None,
            config_path: None,
            report_path: None,
            full_frame: false,
            debug_mode: false,
        }
    }
}

impl Args {
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse flags (program name excluded). `None` means exit without scanning.
    pub fn parse_from<I>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Coin OCR Scan v{}", env!("APP_VERSION_DISPLAY"));
                return None;
            } else if arg == "--debug" {
                parsed.debug_mode = true;
            } else if arg == "--full-frame" {
                parsed.full_frame = true;
            } else if let Some(val) = arg.strip_prefix("--input=") {
                parsed.input_dir = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--templates=") {
                parsed.template_dir = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--output=") {
                parsed.output_dir = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--tessdata=") {
                parsed.tessdata_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--config=") {
                parsed.config_path = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--report=") {
                parsed.report_path = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--workers=") {
                match val.parse::<usize>() {
                    Ok(n) if n > 0 => parsed.workers = Some(n),
                    _ => {
                        eprintln!("❌ Invalid worker count: {}", val);
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        Some(parsed)
    }

    /// Requested worker count, or one per available core
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

fn print_help() {
    println!("🪙 Coin OCR Scan");
    println!();
    println!("USAGE:");
    println!("    coin-ocr-scan [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --input=DIR         Screenshot directory (default: {DEFAULT_INPUT_DIR})");
    println!("    --templates=DIR     Directory with coin_template_*.png (default: {DEFAULT_TEMPLATE_DIR})");
    println!("    --output=DIR        Annotated slice output (default: {DEFAULT_OUTPUT_DIR})");
    println!("    --tessdata=DIR      Tesseract language data directory");
    println!("    --workers=N         Parallel workers (default: CPU count)");
    println!("    --config=FILE       JSON file with scan/ocr settings");
    println!("    --report=FILE       Write readings as JSON lines");
    println!("    --full-frame        Scan whole screenshots as a single slice");
    println!("    --debug             Enable debug output");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    coin-ocr-scan");
    println!("    coin-ocr-scan --input=shots --report=readings.jsonl");
    println!("    coin-ocr-scan --workers=2 --debug");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Args> {
        Args::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args, Args::default());
        assert_eq!(args.input_dir, PathBuf::from("ScreenShot"));
        assert_eq!(args.output_dir, PathBuf::from("DebugImages"));
        assert!(args.worker_count() >= 1);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--input=shots",
            "--templates=coins",
            "--output=out",
            "--tessdata=/usr/share/tessdata",
            "--workers=3",
            "--config=scan.json",
            "--report=readings.jsonl",
            "--full-frame",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.input_dir, PathBuf::from("shots"));
        assert_eq!(args.template_dir, PathBuf::from("coins"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.tessdata_dir, Some(PathBuf::from("/usr/share/tessdata")));
        assert_eq!(args.worker_count(), 3);
        assert_eq!(args.config_path, Some(PathBuf::from("scan.json")));
        assert_eq!(args.report_path, Some(PathBuf::from("readings.jsonl")));
        assert!(args.full_frame);
        assert!(args.debug_mode);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--workers=0"]).is_none());
        assert!(parse(&["--workers=many"]).is_none());
        assert!(parse(&["--gui"]).is_none());
        assert!(parse(&["--help"]).is_none());
    }
}
