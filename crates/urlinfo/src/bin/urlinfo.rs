// ABOUTME: CLI binary for the urlinfo link-preview service.
// ABOUTME: Looks up URLs or local HTML files and prints response envelopes, or runs the HTTP server.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use urlinfo::logging::init_logging;
use urlinfo::{server, Client, ExtractorKind, UrlInfoResponse};

#[derive(Parser, Debug)]
#[command(name = "urlinfo")]
#[command(about = "Fetch pages and extract link-preview metadata")]
struct Args {
    /// Run the HTTP server on this address (e.g. 127.0.0.1:8080)
    #[arg(long = "serve")]
    serve: Option<String>,

    /// HTML file to extract from (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL the HTML file was served from; relative links resolve against it
    #[arg(long = "url")]
    url: Option<String>,

    /// Extraction strategy: structural (default) or pattern
    #[arg(long = "extractor", default_value = "structural")]
    extractor: String,

    /// Fetch deadline in seconds
    #[arg(long = "timeout-secs", default_value_t = 10)]
    timeout_secs: u64,

    /// Body ceiling in bytes
    #[arg(long = "max-body-bytes")]
    max_body_bytes: Option<usize>,

    /// Redirects followed before a fetch fails
    #[arg(long = "max-redirects")]
    max_redirects: Option<usize>,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Fail fetches that redirect to a private/local host
    #[arg(long = "block-private-redirects")]
    block_private_redirects: bool,

    /// Print single-line JSON instead of pretty JSON
    #[arg(long = "compact")]
    compact: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// URLs to look up
    #[arg()]
    urls: Vec<String>,
}

fn format_output(responses: &[UrlInfoResponse], compact: bool) -> serde_json::Result<String> {
    match (responses, compact) {
        ([single], true) => serde_json::to_string(single),
        ([single], false) => serde_json::to_string_pretty(single),
        (many, true) => serde_json::to_string(many),
        (many, false) => serde_json::to_string_pretty(many),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let modes = [args.serve.is_some(), args.html.is_some(), !args.urls.is_empty()];
    match modes.iter().filter(|m| **m).count() {
        0 => {
            eprintln!("error: at least one URL is required, or use --html with --url, or --serve");
            return ExitCode::from(1);
        }
        1 => {}
        _ => {
            eprintln!("error: --serve, --html and positional URLs are mutually exclusive");
            return ExitCode::from(1);
        }
    }

    let mut builder = Client::builder()
        .extractor(ExtractorKind::from(args.extractor.as_str()))
        .timeout(Duration::from_secs(args.timeout_secs))
        .allow_private_networks(args.allow_private_networks)
        .block_private_redirects(args.block_private_redirects);
    if let Some(max) = args.max_body_bytes {
        builder = builder.max_body_bytes(max);
    }
    if let Some(max) = args.max_redirects {
        builder = builder.max_redirects(max);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(addr) = &args.serve {
        return match server::serve(addr, client).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: server failed: {:#}", e);
                ExitCode::from(1)
            }
        };
    }

    let start = Instant::now();
    let mut responses: Vec<UrlInfoResponse> = Vec::new();
    let mut had_error = false;

    if let Some(html_path) = &args.html {
        let Some(url) = args.url.as_deref() else {
            eprintln!("error: --url is required when using --html");
            return ExitCode::from(1);
        };
        match fs::read_to_string(html_path) {
            Ok(html) => match client.extract_html(&html, url) {
                Ok(meta) => responses.push(UrlInfoResponse::success(meta)),
                Err(e) => {
                    eprintln!("error extracting {:?}: {}", html_path, e);
                    had_error = true;
                }
            },
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else {
        for url in &args.urls {
            match client.lookup(url).await {
                Ok(meta) => responses.push(UrlInfoResponse::success(meta)),
                Err(e) => {
                    eprintln!("error looking up {}: {}", url, e);
                    let msg = format!("Invalid URL: {}", e.reason());
                    responses.push(UrlInfoResponse::error(msg));
                }
            }
        }
    }

    let elapsed = start.elapsed();

    if !responses.is_empty() {
        match format_output(&responses, args.compact) {
            Ok(output_str) => {
                if let Some(output_path) = &args.output {
                    if let Err(e) = fs::write(output_path, &output_str) {
                        eprintln!("error writing to {:?}: {}", output_path, e);
                        had_error = true;
                    }
                } else {
                    println!("{}", output_str);
                }
            }
            Err(e) => {
                eprintln!("error serializing output: {}", e);
                had_error = true;
            }
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error || responses.iter().any(|r| !r.is_success()) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
