const DEFAULT_CRAWL_LIMIT: u32 = 5;

pub const USAGE: &str = "\
Usage: abc-directory [COMMAND]

Commands:
  directory                         Scrape the ABC directory for every configured state (default)
  page <url>                        Print the title, text and links of a page as JSON
  firecrawl-scrape <url>            Scrape one page through Firecrawl
  firecrawl-crawl <url> [limit]     Crawl a site through Firecrawl (default limit 5)

Set APP_ENVIRONMENT=production for the full headless run.";

#[derive(Debug, PartialEq)]
pub enum Command {
    Directory,
    Page { url: String },
    FirecrawlScrape { url: String },
    FirecrawlCrawl { url: String, limit: u32 },
    Help,
}

/// Parses the arguments following the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Command> {
    let mut args = args.into_iter();

    let command = match args.next().as_deref() {
        None | Some("directory") => Command::Directory,
        Some("page") => Command::Page {
            url: args.next().ok_or_else(|| anyhow::anyhow!("Missing url for page"))?,
        },
        Some("firecrawl-scrape") => Command::FirecrawlScrape {
            url: args
                .next()
                .ok_or_else(|| anyhow::anyhow!("Missing url for firecrawl-scrape"))?,
        },
        Some("firecrawl-crawl") => {
            let url = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("Missing url for firecrawl-crawl"))?;
            let limit = match args.next() {
                Some(limit) => limit
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid crawl limit: {}", limit))?,
                None => DEFAULT_CRAWL_LIMIT,
            };
            Command::FirecrawlCrawl { url, limit }
        }
        Some("-h") | Some("--help") => Command::Help,
        Some(other) => anyhow::bail!("Unknown command: {}\n\n{}", other, USAGE),
    };

    if let Some(extra) = args.next() {
        anyhow::bail!("Unexpected argument: {}", extra);
    }

    Ok(command)
}
