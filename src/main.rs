use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use webdav_fs::{config::Config, DavResource, WebDavFs};

fn cli() -> Command {
    let path = Arg::new("path")
        .help("Path relative to the root URL, or an absolute http(s) URL")
        .required(true)
        .index(1);
    let destination = Arg::new("destination")
        .help("Destination URL sent verbatim in the Destination header")
        .required(true)
        .index(2);
    let overwrite = Arg::new("overwrite")
        .help("Replace an existing destination")
        .long("overwrite")
        .short('f')
        .action(ArgAction::SetTrue);

    Command::new("davfs")
        .about("Browse and modify a WebDAV server")
        .arg(
            Arg::new("root")
                .help("Root URL of the WebDAV share (defaults to WEBDAV_ROOT_URL)")
                .long("root")
                .short('r')
                .value_name("URL")
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("ls")
                .about("List a directory")
                .arg(Arg::new("path").help("Directory path").index(1).default_value(""))
                .arg(
                    Arg::new("json")
                        .help("Print entries with their properties as JSON")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("cat").about("Print a remote file").arg(path.clone()))
        .subcommand(
            Command::new("put")
                .about("Upload a local file")
                .arg(path.clone())
                .arg(Arg::new("source").help("Local file to upload").required(true).index(2)),
        )
        .subcommand(Command::new("mkdir").about("Create a collection").arg(path.clone()))
        .subcommand(
            Command::new("rm")
                .about("Delete a file or collection")
                .arg(path.clone()),
        )
        .subcommand(
            Command::new("mv")
                .about("Move a resource")
                .arg(path.clone())
                .arg(destination.clone())
                .arg(overwrite.clone()),
        )
        .subcommand(
            Command::new("cp")
                .about("Copy a resource")
                .arg(path)
                .arg(destination)
                .arg(overwrite),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let config = Config::from_env()?;
    let root = matches.get_one::<String>("root").map(String::as_str);
    let fs = WebDavFs::with_config(config.webdav_config(root)?)?;

    match matches.subcommand() {
        Some(("ls", sub)) => list(&fs, sub).await?,
        Some(("cat", sub)) => {
            let text = fs.file(arg(sub, "path")).read().await?;
            print!("{}", text);
        }
        Some(("put", sub)) => {
            let data = tokio::fs::read(arg(sub, "source")).await?;
            fs.file(arg(sub, "path")).write(data).await?;
        }
        Some(("mkdir", sub)) => {
            fs.dir(arg(sub, "path")).mkdir().await?;
        }
        Some(("rm", sub)) => {
            fs.file(arg(sub, "path")).rm().await?;
        }
        Some(("mv", sub)) => {
            fs.file(arg(sub, "path"))
                .move_to(arg(sub, "destination"), sub.get_flag("overwrite"))
                .await?;
        }
        Some(("cp", sub)) => {
            fs.file(arg(sub, "path"))
                .copy_to(arg(sub, "destination"), sub.get_flag("overwrite"))
                .await?;
        }
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

async fn list(fs: &WebDavFs, matches: &ArgMatches) -> Result<()> {
    let children = fs.dir(arg(matches, "path")).children().await?;

    if matches.get_flag("json") {
        let summaries: Vec<_> = children.iter().map(|child| child.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for child in &children {
        let marker = if child.is_dir() { "/" } else { "" };
        let size = child
            .properties()
            .content_length()
            .map(|len| len.to_string())
            .unwrap_or_else(|| "-".to_string());
        let modified = child
            .properties()
            .last_modified()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>12}  {:<16}  {}{}", size, modified, child.name(), marker);
    }

    Ok(())
}
