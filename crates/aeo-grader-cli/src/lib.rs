//! Command-line parsing and output helpers for `aeo-grader`
//!
//! Kept separate from `main.rs` so the argument handling can be unit tested
//! without a network or a built binary.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

pub const APP_NAME: &str = "aeo-grader";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub url: String,
    pub offline: bool,
    pub json: bool,
    /// Directory or `.pdf` file to export the report to
    pub pdf_target: Option<PathBuf>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadOptions {
    pub url: String,
    pub offline: bool,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub company_size: Option<String>,
    pub challenge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run(CliOptions),
    Lead(LeadOptions),
    Help,
    Version,
}

pub fn parse_arguments(args: &[String]) -> Result<CliCommand> {
    if args.is_empty() {
        return Ok(CliCommand::Help);
    }

    if args[0] == "lead" {
        return parse_lead_arguments(&args[1..]);
    }

    let mut url: Option<String> = None;
    let mut offline = false;
    let mut json = false;
    let mut pdf_target: Option<PathBuf> = None;
    let mut email: Option<String> = None;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if matches!(arg.as_str(), "-h" | "--help") {
            return Ok(CliCommand::Help);
        }

        if matches!(arg.as_str(), "-v" | "--version") {
            return Ok(CliCommand::Version);
        }

        if matches!(arg.as_str(), "-o" | "--offline") {
            offline = true;
            i += 1;
            continue;
        }

        if matches!(arg.as_str(), "-j" | "--json") {
            json = true;
            i += 1;
            continue;
        }

        if let Some(value) = arg.strip_prefix("--pdf=") {
            if pdf_target.is_some() {
                return Err(anyhow!("--pdf specified multiple times"));
            }
            pdf_target = Some(path_or_current_dir(value));
            i += 1;
            continue;
        }

        if matches!(arg.as_str(), "-p" | "--pdf") {
            if pdf_target.is_some() {
                return Err(anyhow!("--pdf specified multiple times"));
            }
            // A following bare word is the path only once the URL is known
            let next_is_path = url.is_some()
                && args
                    .get(i + 1)
                    .map(|next| !next.starts_with('-'))
                    .unwrap_or(false);

            if next_is_path {
                pdf_target = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            } else {
                pdf_target = Some(PathBuf::from("."));
                i += 1;
            }
            continue;
        }

        if matches!(arg.as_str(), "-e" | "--email") {
            email = Some(required_value(args, i)?);
            i += 2;
            continue;
        }

        if arg.starts_with('-') {
            return Err(anyhow!("unknown flag: {arg}"));
        }

        if url.is_none() {
            url = Some(arg.clone());
        } else {
            return Err(anyhow!("unexpected additional argument: {}", arg));
        }

        i += 1;
    }

    let url = url.ok_or_else(|| anyhow!("missing <url> argument"))?;

    Ok(CliCommand::Run(CliOptions {
        url,
        offline,
        json,
        pdf_target,
        email,
    }))
}

fn parse_lead_arguments(args: &[String]) -> Result<CliCommand> {
    let mut url: Option<String> = None;
    let mut offline = false;
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;
    let mut company: Option<String> = None;
    let mut company_size: Option<String> = None;
    let mut challenge: Option<String> = None;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let slot = match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-o" | "--offline" => {
                offline = true;
                i += 1;
                continue;
            }
            "--name" => &mut name,
            "--email" => &mut email,
            "--company" => &mut company,
            "--size" => &mut company_size,
            "--challenge" => &mut challenge,
            flag if flag.starts_with('-') => return Err(anyhow!("unknown flag: {flag}")),
            _ => {
                if url.is_some() {
                    return Err(anyhow!("unexpected additional argument: {}", arg));
                }
                url = Some(arg.clone());
                i += 1;
                continue;
            }
        };

        *slot = Some(required_value(args, i)?);
        i += 2;
    }

    Ok(CliCommand::Lead(LeadOptions {
        url: url.ok_or_else(|| anyhow!("missing <url> argument"))?,
        offline,
        name: name.ok_or_else(|| anyhow!("lead requires --name"))?,
        email: email.ok_or_else(|| anyhow!("lead requires --email"))?,
        company,
        company_size,
        challenge,
    }))
}

fn required_value(args: &[String], flag_index: usize) -> Result<String> {
    match args.get(flag_index + 1) {
        Some(value) if !value.starts_with('-') && !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(anyhow!("{} requires a value", args[flag_index])),
    }
}

fn path_or_current_dir(value: &str) -> PathBuf {
    if value.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(value)
    }
}

pub fn help_text() -> String {
    format!(
        "{APP_NAME} - AEO website grader for healthcare & life sciences
Usage: {APP_NAME} [OPTIONS] <URL>
       {APP_NAME} lead --name <NAME> --email <EMAIL> [LEAD OPTIONS] <URL>

Options:
  -o, --offline           Skip live probes (deterministic grade only)
  -j, --json              Print the report as JSON
  -p, --pdf [PATH]        Export the PDF report (directory or .pdf file)
  -e, --email <EMAIL>     Email recorded with the submission
  -v, --version           Show version information
  -h, --help              Show this help message

Lead options:
  --name <NAME>           Contact name (required)
  --email <EMAIL>         Contact email (required)
  --company <COMPANY>     Company name
  --size <SIZE>           Company size
  --challenge <TEXT>      Biggest AEO challenge
  -o, --offline           Grade without live probes

Environment:
  PAGESPEED_API_KEY, PAGESPEED_STRATEGY, CONTENT_PROXIES, HTTP_TIMEOUT_SECS,
  SUPABASE_URL, SUPABASE_ANON_KEY, LOG_LEVEL / RUST_LOG
"
    )
}

/// Resolve where the PDF goes: an explicit `.pdf` path is used as is,
/// anything else is a directory that receives `filename`.
pub fn build_pdf_path(base: &Path, filename: &str) -> PathBuf {
    let has_pdf_extension = base
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if has_pdf_extension {
        base.to_path_buf()
    } else {
        base.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_options(list: &[&str]) -> CliOptions {
        match parse_arguments(&args(list)).unwrap() {
            CliCommand::Run(options) => options,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn empty_arguments_show_help() {
        assert_eq!(parse_arguments(&[]).unwrap(), CliCommand::Help);
        assert_eq!(parse_arguments(&args(&["example.com", "-h"])).unwrap(), CliCommand::Help);
        assert_eq!(parse_arguments(&args(&["--version"])).unwrap(), CliCommand::Version);
    }

    #[test]
    fn plain_url() {
        let options = run_options(&["example.com"]);
        assert_eq!(options.url, "example.com");
        assert!(!options.offline);
        assert!(!options.json);
        assert!(options.pdf_target.is_none());
        assert!(options.email.is_none());
    }

    #[test]
    fn flags_in_any_order() {
        let options = run_options(&["-o", "--json", "example.com", "-e", "me@example.com"]);
        assert!(options.offline);
        assert!(options.json);
        assert_eq!(options.email.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn pdf_target_variants() {
        let options = run_options(&["example.com", "--pdf"]);
        assert_eq!(options.pdf_target, Some(PathBuf::from(".")));

        let options = run_options(&["example.com", "-p", "reports/out.pdf"]);
        assert_eq!(options.pdf_target, Some(PathBuf::from("reports/out.pdf")));

        // Before the URL a bare word is the URL, not the path
        let options = run_options(&["-p", "example.com"]);
        assert_eq!(options.url, "example.com");
        assert_eq!(options.pdf_target, Some(PathBuf::from(".")));

        let options = run_options(&["--pdf=out", "example.com"]);
        assert_eq!(options.pdf_target, Some(PathBuf::from("out")));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_arguments(&args(&["--frobnicate", "example.com"])).is_err());
        assert!(parse_arguments(&args(&["a.com", "b.com"])).is_err());
        assert!(parse_arguments(&args(&["-o"])).is_err());
        assert!(parse_arguments(&args(&["a.com", "--email"])).is_err());
        assert!(parse_arguments(&args(&["a.com", "-p", "-p"])).is_err());
    }

    #[test]
    fn lead_command() {
        let command = parse_arguments(&args(&[
            "lead",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--size",
            "51-200",
            "example.com",
        ]))
        .unwrap();

        assert_eq!(
            command,
            CliCommand::Lead(LeadOptions {
                url: "example.com".to_string(),
                offline: false,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                company: None,
                company_size: Some("51-200".to_string()),
                challenge: None,
            })
        );
    }

    #[test]
    fn lead_requires_contact_details() {
        assert!(parse_arguments(&args(&["lead", "--email", "a@b.co", "example.com"])).is_err());
        assert!(parse_arguments(&args(&["lead", "--name", "Ada", "example.com"])).is_err());
        assert!(parse_arguments(&args(&["lead", "--name", "Ada", "--email", "a@b.co"])).is_err());
    }

    #[test]
    fn pdf_path_resolution() {
        assert_eq!(
            build_pdf_path(Path::new("."), "AEO-Report-example-com.pdf"),
            PathBuf::from("./AEO-Report-example-com.pdf")
        );
        assert_eq!(
            build_pdf_path(Path::new("out/Report.PDF"), "ignored.pdf"),
            PathBuf::from("out/Report.PDF")
        );
    }

    #[test]
    fn help_lists_every_option() {
        let help = help_text();
        for flag in ["--offline", "--json", "--pdf", "--email", "--name", "--challenge"] {
            assert!(help.contains(flag), "help is missing {flag}");
        }
    }
}
