use clap::{Parser, Subcommand};
use reqwest::header::{LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;

#[derive(Parser)]
#[command(name = "bookmark-cli")]
#[command(about = "Command-line client for the bookmark server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the form page with every known bookmark
    List,
    /// Register a short name for a long URI
    Add {
        short_name: String,
        long_uri: String,
        /// Display name to remember in the visitor cookie
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print the URI a short name redirects to
    Resolve { short_name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    // 303s are the answer we want to show, not follow.
    let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::List => {
            let res = client.get(format!("{}/", base)).send().await?;
            print_body(res).await?;
        }
        Commands::Add {
            short_name,
            long_uri,
            name,
        } => {
            let mut form = vec![("longuri", long_uri), ("shortname", short_name)];
            if let Some(name) = name {
                form.push(("yourname", name));
            }
            let res = client.post(format!("{}/", base)).form(&form).send().await?;
            if res.status() == StatusCode::SEE_OTHER {
                println!("Saved.");
                if let Some(cookie) = res.headers().get(SET_COOKIE) {
                    println!("Set-Cookie: {}", cookie.to_str()?);
                }
            } else {
                print_body(res).await?;
            }
        }
        Commands::Resolve { short_name } => {
            let res = client
                .get(format!("{}/{}", base, encode_segment(&short_name)))
                .send()
                .await?;
            match res.headers().get(LOCATION) {
                Some(location) if res.status() == StatusCode::SEE_OTHER => {
                    println!("{}", location.to_str()?);
                }
                _ => print_body(res).await?,
            }
        }
    }

    Ok(())
}

fn encode_segment(segment: &str) -> String {
    // form encoding turns spaces into '+', which a path keeps literally.
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

async fn print_body(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if status.is_success() {
        println!("{}", text);
    } else {
        eprintln!("Error: server returned status {}", status);
        eprintln!("Response: {}", text);
    }
    Ok(())
}
