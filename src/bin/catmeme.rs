use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use catmeme::{
    Action, CaptionPair, CaptionSource, CatApiSource, Compositor, Config, Exporter, HistoryStore,
    JsonFileKv, LlmCaptionSource, LocalImageSource, MemeResult, Notice, Studio,
    load_random_image, write_png,
};

#[derive(Parser, Debug)]
#[command(name = "catmeme", version, about = "Random cat pictures with meme captions")]
struct Cli {
    /// Config file (default: <config dir>/catmeme/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr. `RUST_LOG` takes precedence.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a random cat, caption it, preview and optionally save.
    New(NewArgs),
    /// Burn captions into a local image and write a JPEG.
    Render(RenderArgs),
    /// Print a generated caption pair.
    Caption,
    /// Inspect and manage saved memes.
    History {
        #[command(subcommand)]
        cmd: HistoryCommand,
    },
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Ask the caption generator for a caption.
    #[arg(long, default_value_t = false)]
    generate: bool,

    /// Top text (overrides a generated one).
    #[arg(long)]
    top: Option<String>,

    /// Bottom text (overrides a generated one).
    #[arg(long)]
    bottom: Option<String>,

    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Write the live preview as a PNG.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Export the meme and add it to the history.
    #[arg(long, default_value_t = false)]
    save: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    #[arg(long, default_value = "")]
    top: String,

    #[arg(long, default_value = "")]
    bottom: String,

    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved memes, newest first.
    List,
    /// Delete a saved meme.
    Delete { id: String },
    /// Write a saved meme back out as `cat-meme-<id>.jpg`.
    Export {
        id: String,
        /// Target directory (default: the configured export dir).
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_api_key_override(|name| std::env::var(name).ok());

    match cli.cmd {
        Command::New(args) => cmd_new(config, args).await,
        Command::Render(args) => cmd_render(config, args).await,
        Command::Caption => cmd_caption(config).await,
        Command::History { cmd } => cmd_history(config, cmd),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "catmeme=debug" } else { "catmeme=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the success notice, or turn the error into one carrying the notice as context.
fn notify<T>(action: Action, result: MemeResult<T>) -> anyhow::Result<T> {
    match result {
        Ok(v) => {
            eprintln!("{}", Notice::done(action));
            Ok(v)
        }
        Err(e) => {
            let notice = Notice::from_error(action, &e);
            Err(anyhow::Error::new(e).context(notice.message))
        }
    }
}

fn with_width(mut config: Config, width: Option<u32>) -> anyhow::Result<Config> {
    if let Some(w) = width {
        config.target_width = w;
    }
    config.validate()?;
    Ok(config)
}

fn caption_source(config: &Config, client: reqwest::Client) -> LlmCaptionSource {
    LlmCaptionSource::new(
        client,
        config.caption_api_url.clone(),
        config.caption_model.clone(),
        config.api_key.clone(),
    )
}

fn open_history(config: &Config) -> anyhow::Result<HistoryStore<JsonFileKv>> {
    let path = config.store_path()?;
    let kv = JsonFileKv::open(&path)?;
    HistoryStore::open(kv).with_context(|| format!("open history '{}'", path.display()))
}

async fn cmd_new(config: Config, args: NewArgs) -> anyhow::Result<()> {
    let config = with_width(config, args.width)?;
    let client = config.http_client()?;

    let mut studio = Studio::new(
        CatApiSource::new(client.clone(), config.image_api_url.clone()),
        caption_source(&config, client),
        Compositor::new(config.font_source()),
        open_history(&config)?,
        Exporter::new(config.export_dir.clone()),
    )
    .with_target_width(config.target_width);

    notify(Action::LoadImage, studio.load_new_image().await)?;
    if let Some(image) = studio.session().image() {
        println!("image: {} ({})", image.source.id, image.source.url);
    }

    if args.generate {
        notify(Action::GenerateCaption, studio.generate_caption().await)?;
    }
    if let Some(top) = &args.top {
        studio.set_top_text(top);
    }
    if let Some(bottom) = &args.bottom {
        studio.set_bottom_text(bottom);
    }
    print_caption(studio.session().caption());

    if let Some(path) = &args.preview {
        let frame = studio.preview()?;
        create_parent(path)?;
        write_png(&frame, path)?;
        eprintln!("wrote {}", path.display());
    }

    if args.save {
        let saved = notify(Action::Save, studio.save())?;
        println!("saved {} -> {}", saved.record.id, saved.path.display());
    }
    Ok(())
}

async fn cmd_render(config: Config, args: RenderArgs) -> anyhow::Result<()> {
    let config = with_width(config, args.width)?;
    let image = load_random_image(&LocalImageSource::new(&args.image))
        .await
        .with_context(|| format!("load '{}'", args.image.display()))?;

    let mut compositor = Compositor::new(config.font_source());
    let caption = CaptionPair::new(args.top, args.bottom);
    let jpeg = compositor.compose_jpeg(&image.pixels, &caption, config.target_width)?;

    create_parent(&args.out)?;
    std::fs::write(&args.out, jpeg)
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_caption(config: Config) -> anyhow::Result<()> {
    let source = caption_source(&config, config.http_client()?);
    let caption = notify(Action::GenerateCaption, source.request_caption().await)?;
    print_caption(&caption);
    Ok(())
}

fn cmd_history(config: Config, cmd: HistoryCommand) -> anyhow::Result<()> {
    let mut history = open_history(&config)?;
    match cmd {
        HistoryCommand::List => {
            if history.is_empty() {
                println!("no saved memes");
            }
            for r in history.list() {
                let when = chrono::DateTime::from_timestamp_millis(r.created_at)
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| r.created_at.to_string());
                println!("{}  {when}  {:?} / {:?}", r.id, r.top_text, r.bottom_text);
            }
        }
        HistoryCommand::Delete { id } => {
            let removed = history.remove(&id);
            if matches!(removed, Ok(false)) {
                eprintln!("no saved meme with id {id}, nothing to delete");
                return Ok(());
            }
            notify(Action::Delete, removed)?;
        }
        HistoryCommand::Export { id, out_dir } => {
            let record = history
                .get(&id)
                .with_context(|| format!("no saved meme with id {id}"))?;
            let exporter = Exporter::new(out_dir.unwrap_or_else(|| config.export_dir.clone()));
            let path = exporter.write_record(record)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_caption(caption: &CaptionPair) {
    println!("top:    {}", caption.top);
    println!("bottom: {}", caption.bottom);
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
