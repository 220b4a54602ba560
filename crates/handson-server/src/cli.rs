//! Command line parsing.

use std::path::PathBuf;

use handson_pipeline::{FilterRequest, MatchRequest};

use crate::tools::Tool;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Serve,
    Extract(PathBuf),
    Match(MatchRequest),
    Filter(FilterRequest),
    Generate(PathBuf),
    Tool { tool: Tool, input: String },
    Help,
}

impl Command {
    /// Parse arguments after the program name.
    pub fn parse(args: &[String]) -> Result<Command, String> {
        let Some(name) = args.first() else {
            return Ok(Command::Serve);
        };
        let rest = &args[1..];

        match name.as_str() {
            "serve" => Ok(Command::Serve),
            "extract" => match rest {
                [pdf] => Ok(Command::Extract(PathBuf::from(pdf))),
                _ => Err("Usage: handson extract <pdf>".into()),
            },
            "match" => match rest {
                [master, secondary] => Ok(Command::Match(MatchRequest {
                    master_path: PathBuf::from(master),
                    secondary_path: PathBuf::from(secondary),
                })),
                _ => Err("Usage: handson match <master.json> <secondary.json>".into()),
            },
            "filter" => match rest {
                [master, matches] => Ok(Command::Filter(FilterRequest {
                    master_path: PathBuf::from(master),
                    match_path: PathBuf::from(matches),
                })),
                _ => Err("Usage: handson filter <master.json> <matches.json>".into()),
            },
            "generate" => match rest {
                [path] => Ok(Command::Generate(PathBuf::from(path))),
                _ => Err("Usage: handson generate <filtered.json>".into()),
            },
            "tool" => {
                let (tool_name, input) = rest
                    .split_first()
                    .ok_or_else(|| "Usage: handson tool <name> <input...>".to_string())?;
                let tool = Tool::from_name(tool_name)
                    .ok_or_else(|| format!("Unknown tool: {}", tool_name))?;
                Ok(Command::Tool {
                    tool,
                    input: input.join(" "),
                })
            }
            "--help" | "-h" | "help" => Ok(Command::Help),
            other => Err(format!(
                "Unknown command: {}. Use 'handson help' for usage.",
                other
            )),
        }
    }

    /// Whether the command needs an LLM provider.
    pub fn needs_llm(&self) -> bool {
        match self {
            Command::Serve | Command::Extract(_) | Command::Match(_) | Command::Generate(_) => true,
            Command::Tool { tool, .. } => tool.needs_llm(),
            Command::Filter(_) | Command::Help => false,
        }
    }
}

pub fn print_help() {
    println!("HandsOn — textbook activity extraction pipeline");
    println!();
    println!("Usage: handson [command]");
    println!();
    println!("Commands:");
    println!("  serve                          Start the HTTP server (default)");
    println!("  extract <pdf>                  Extract activities to <stem>_activities.json");
    println!("  match <master> <secondary>     Write matched_activities.json");
    println!("  filter <master> <matches>      Write <master>_filtered.json");
    println!("  generate <filtered>            Write new_activities.json");
    println!("  tool <name> <input...>         Run an agent tool with free-form input");
    println!("  help                           Show this help message");
    println!();
    println!("Tools:");
    for tool in Tool::ALL {
        println!("  {}", tool.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_default_is_serve() {
        assert_eq!(Command::parse(&[]), Ok(Command::Serve));
    }

    #[test]
    fn test_pipeline_commands() {
        assert_eq!(
            Command::parse(&args(&["extract", "book.pdf"])),
            Ok(Command::Extract(PathBuf::from("book.pdf")))
        );
        assert!(matches!(
            Command::parse(&args(&["match", "a.json", "b.json"])),
            Ok(Command::Match(_))
        ));
        assert!(Command::parse(&args(&["match", "a.json"])).is_err());
        assert!(Command::parse(&args(&["frobnicate"])).is_err());
    }

    #[test]
    fn test_tool_command_joins_input() {
        let cmd = Command::parse(&args(&["tool", "ActivityFilter", "a.json,", "b.json"])).unwrap();
        assert_eq!(
            cmd,
            Command::Tool {
                tool: Tool::Filter,
                input: "a.json, b.json".into()
            }
        );
        assert!(!cmd.needs_llm());
        assert!(Command::parse(&args(&["tool", "Nope"])).is_err());
    }

    #[test]
    fn test_filter_needs_no_llm() {
        let cmd = Command::parse(&args(&["filter", "a.json", "m.json"])).unwrap();
        assert!(!cmd.needs_llm());
        assert!(Command::Serve.needs_llm());
    }
}
