//! Veracity CLI
//!
//! Usage:
//!   veracity --image photo.jpg               # Image forensics
//!   veracity --url https://example.com/a     # Fetch and check an article
//!   veracity --text "article text"           # Check text directly
//!   veracity --serve                         # HTTP API server
//!   veracity --image photo.jpg --json        # JSON output

use anyhow::{bail, Context};
use clap::Parser;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use veracity::adapters::{
    CommandFaceDetector, DuckDuckGoSearch, FaceModelAssets, HfClassifier, TesseractOcr, WebFetcher,
};
use veracity::config::Config;
use veracity::core::{run_server, save_report, AppState, ArticlePipeline, ImagePipeline};
use veracity::types::{ArticleReport, ClaimVerdict, FaceStatus, ImageReport, ImageVerdict, OverallVerdict, Report};
use veracity::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "veracity",
    version = VERSION,
    about = "Veracity - Explainable authenticity triage for images and articles",
    long_about = "Veracity extracts several weak signals from an image or a web article\n\
                  and fuses them into an explainable verdict.\n\n\
                  Modes:\n  \
                  --image    OCR, blur and face/skin consistency checks\n  \
                  --url      Fetch an article, detect AI authorship, check claims\n  \
                  --text     Same as --url on text you already have\n  \
                  --serve    HTTP API server mode\n\n\
                  Results are triage, not forensic certainty. Verify by hand."
)]
struct Args {
    /// Image file to analyze
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Article URL to fetch and analyze
    #[arg(short, long)]
    url: Option<String>,

    /// Article text to analyze
    #[arg(short, long)]
    text: Option<String>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// TOML configuration file
    #[arg(short, long, env = "VERACITY_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Skip face analysis
    #[arg(long)]
    no_faces: bool,

    /// Directory for saved reports
    #[arg(long, default_value = "./reports")]
    report_dir: PathBuf,

    /// Do not save reports
    #[arg(long)]
    no_save: bool,

    /// Show every signal and evidence link
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "veracity=debug" } else { "veracity=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(args.config.as_deref()).context("loading configuration")?;

    if args.serve {
        let state = AppState {
            image: Arc::new(build_image_pipeline(&config, args.no_faces)),
            article: Arc::new(build_article_pipeline(&config)?),
            report_dir: (!args.no_save).then(|| args.report_dir.clone()),
        };
        print_header("API Server");
        run_server(&args.addr, state).await.context("server error")?;
        return Ok(());
    }

    let report = if let Some(path) = &args.image {
        let pipeline = build_image_pipeline(&config, args.no_faces);
        let path = path.clone();
        let report = tokio::task::spawn_blocking(move || pipeline.analyze_path(&path))
            .await?
            .context("image analysis failed")?;
        Report::Image(report)
    } else if let Some(url) = &args.url {
        let pipeline = build_article_pipeline(&config)?;
        let report = pipeline
            .analyze_url(url)
            .await
            .with_context(|| format!("could not analyze {}", url))?;
        Report::Article(report)
    } else if let Some(text) = &args.text {
        let pipeline = build_article_pipeline(&config)?;
        Report::Article(pipeline.analyze_text(text, None).await?)
    } else {
        bail!("nothing to analyze: pass --image, --url, --text or --serve");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &report {
            Report::Image(r) => print_image_report(r, args.verbose),
            Report::Article(r) => print_article_report(r, args.verbose),
        }
    }

    if !args.no_save {
        match save_report(&report, &args.report_dir) {
            Ok(path) => info!(path = %path.display(), "report saved"),
            Err(e) => warn!(error = %e, "could not save report"),
        }
    }
    Ok(())
}

/// Image pipeline with real backends; a broken face model disables faces only
fn build_image_pipeline(config: &Config, no_faces: bool) -> ImagePipeline {
    let services = &config.services;
    let pipeline = ImagePipeline::new(
        config.image.clone(),
        Arc::new(TesseractOcr::new(services.tesseract_cmd.clone())),
    );
    if no_faces {
        return pipeline.without_faces("disabled by --no-faces");
    }

    let assets = FaceModelAssets::new(&services.face_prototxt, &services.face_weights);
    match CommandFaceDetector::new(services.face_detector_cmd.clone(), assets) {
        Ok(detector) => pipeline.with_face_detector(Arc::new(detector)),
        Err(e) => {
            warn!(error = %e, "face analysis disabled");
            pipeline.without_faces(e.to_string())
        }
    }
}

fn build_article_pipeline(config: &Config) -> anyhow::Result<ArticlePipeline> {
    let timeout = config.article.search_timeout();
    let fetcher = WebFetcher::from_config(&config.services, &config.article)?;
    let classifier = HfClassifier::from_config(&config.services, config.article.classifier_timeout())?;
    let search = DuckDuckGoSearch::from_config(&config.services, timeout)?;
    Ok(ArticlePipeline::new(
        config,
        Arc::new(fetcher),
        Arc::new(classifier),
        Arc::new(search),
    ))
}

fn print_header(mode: &str) {
    println!("{}", "════════════════════════════════════════".bold());
    println!("{}", format!("  Veracity v{} - {}", VERSION, mode).bold());
    println!("{}", "════════════════════════════════════════".bold());
    println!();
}

fn image_verdict_colored(verdict: ImageVerdict) -> ColoredString {
    let text = format!("{} {}", verdict.emoji(), verdict);
    match verdict {
        ImageVerdict::Safe => text.green().bold(),
        ImageVerdict::Suspicious => text.red().bold(),
    }
}

fn print_image_report(report: &ImageReport, verbose: bool) {
    print_header("Image Analysis");
    println!("Source:   {}", report.source);
    println!(
        "OCR:      {} words, {:.1}% confidence{}",
        report.ocr.word_count,
        report.ocr.avg_confidence,
        if report.ocr.reliable { "" } else { " (unreliable)" }
    );
    if !report.ocr.text.is_empty() {
        println!("Text:     {}", report.ocr.text.replace('\n', " ").dimmed());
    }

    match &report.faces {
        FaceStatus::Analyzed(analysis) => {
            println!("Faces:    {} detected", analysis.regions.len());
            if verbose {
                for region in &analysis.regions {
                    let b = &region.bounding_box;
                    let skin = region
                        .skin_std_max
                        .map_or("n/a".to_string(), |s| format!("{:.1}", s));
                    println!(
                        "  {}",
                        format!(
                            "[{},{} {}x{}] conf={:.2} blur={:.1} skin_std={}",
                            b.x, b.y, b.width, b.height, region.confidence, region.blur_variance, skin
                        )
                        .dimmed()
                    );
                }
            }
        }
        FaceStatus::Disabled { reason } => {
            println!("Faces:    {}", format!("not analyzed ({})", reason).yellow());
        }
    }

    if verbose {
        println!();
        println!("Signals:");
        for signal in &report.signals {
            let mark = if signal.triggered { "✗".red() } else { "✓".green() };
            println!("  {} {} ({})", mark, signal.name, signal.detail);
        }
    }

    println!();
    println!("Verdict:  {}", image_verdict_colored(report.verdict));
    for reason in &report.reasons {
        println!("  - {}", reason);
    }
}

fn claim_verdict_colored(verdict: ClaimVerdict) -> ColoredString {
    match verdict {
        ClaimVerdict::LikelyTrue | ClaimVerdict::MoreFor => verdict.label().green(),
        ClaimVerdict::LikelyFalse | ClaimVerdict::MoreAgainst => verdict.label().red(),
        ClaimVerdict::MixedEvidence => verdict.label().yellow(),
        ClaimVerdict::NoEvidence => verdict.label().dimmed(),
    }
}

fn overall_verdict_colored(verdict: OverallVerdict) -> ColoredString {
    match verdict {
        OverallVerdict::PotentialAiMisinformation | OverallVerdict::PotentialMisinformation => {
            verdict.label().red().bold()
        }
        OverallVerdict::LikelyAiGenerated => verdict.label().yellow().bold(),
        OverallVerdict::NoStrongIndicators => verdict.label().green().bold(),
    }
}

fn print_article_report(report: &ArticleReport, verbose: bool) {
    print_header("Article Analysis");
    if let Some(url) = &report.url {
        println!("URL:      {}", url);
    }
    println!("Excerpt:  {}", report.content_excerpt.dimmed());

    match &report.ai_detection {
        Some(ai) => println!(
            "AI check: {} ({}, score {:.2})",
            ai.verdict_label(),
            ai.label,
            ai.score
        ),
        None => println!("AI check: {}", "unavailable".yellow()),
    }

    println!();
    if report.claims.is_empty() {
        println!("No checkable claims found.");
    }
    for (i, claim) in report.claims.iter().enumerate() {
        println!("{}. {}", i + 1, claim.text);
        println!(
            "   {} (support {}, challenge {})",
            claim_verdict_colored(claim.verdict),
            claim.support_links.len(),
            claim.challenge_links.len()
        );
        if let Some(err) = &claim.evidence_error {
            println!("   {}", format!("evidence unavailable: {}", err).yellow());
        }
        if verbose {
            for link in &claim.support_links {
                println!("   {} {}", "+".green(), link);
            }
            for link in &claim.challenge_links {
                println!("   {} {}", "-".red(), link);
            }
        }
    }

    println!();
    println!("Verdict:  {}", overall_verdict_colored(report.overall_verdict));
    println!("{}", report.methodology.dimmed());
}
