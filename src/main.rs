use clap::{Parser, Subcommand};
use soulpress::{collect, config, generate, logging, output, serve};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let tagged = env!("SOULPRESS_TAGGED");
    if tagged == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("SOULPRESS_REVISION");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "soulpress")]
#[command(about = "Localized personal blog from MDX files")]
#[command(long_about = "\
Localized personal blog from MDX files

Posts, authors and soul documents are Markdown files with YAML frontmatter.
The locale comes from the directory, the slug from the file name.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── assets/                      # Copied to the output root (favicon, images)
  ├── locales/
  │   └── es.json                  # UI message overrides per locale
  ├── authors/
  │   └── andoni.mdx               # name, twitter
  ├── blog/
  │   ├── en/
  │   │   ├── hello-world.mdx      # title, date, description, soul, authors
  │   │   └── deep-dive/index.mdx  # index files take the directory name
  │   └── es/
  │       └── hola-mundo.mdx
  └── soul/
      └── en/
          └── mosca.mdx            # name, alias, version, lastReflection, brief

Every post is also published as plain Markdown at /blog/<slug>.md and
listed in /llms.txt.

Run 'soulpress gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (content.json)
    #[arg(long, default_value = ".soulpress-temp", global = true)]
    temp_dir: PathBuf,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect and validate content into content.json
    Collect,
    /// Produce the site from content.json
    Generate,
    /// Run the full pipeline: collect → generate
    Build,
    /// Validate content without writing anything
    Check,
    /// Preview the site over HTTP, rendered straight from the content directory
    Serve {
        /// Port to listen on; the next free port is used when it is taken
        #[arg(long, default_value_t = 5277)]
        port: u16,
        /// Interface to bind
        #[arg(long, default_value = "127.0.0.1")]
        interface: IpAddr,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Collect => {
            let content = collect_with_pool(&cli.source)?;
            write_content_json(&content, &cli.temp_dir)?;
            output::print_collect_output(&content, &cli.source);
        }
        Command::Generate => {
            let content_path = cli.temp_dir.join("content.json");
            let report = generate::generate(&content_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Collecting {}", cli.source.display());
            let content = collect_with_pool(&cli.source)?;
            let content_path = write_content_json(&content, &cli.temp_dir)?;
            output::print_collect_output(&content, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&content_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let content = collect_with_pool(&cli.source)?;
            let planned = generate::planned_files(&content);
            output::print_check_output(&content, planned.len());
        }
        Command::Serve { port, interface } => {
            let content = collect_with_pool(&cli.source)?;
            serve::serve(&content, &cli.source, interface, port)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Size the rayon pool from the content's config, then collect.
///
/// The config is read once up front so the pool exists before the parallel
/// body compilation starts.
fn collect_with_pool(source: &Path) -> Result<soulpress::types::Content, Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    init_thread_pool(&site_config.processing);
    Ok(collect::collect(source)?)
}

fn write_content_json(
    content: &soulpress::types::Content,
    temp_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let content_path = temp_dir.join("content.json");
    let json = serde_json::to_string_pretty(content)?;
    std::fs::write(&content_path, json)?;
    Ok(content_path)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
