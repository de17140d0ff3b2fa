//! Command parsing and execution for the shell

use std::fmt;

use lrucache::LruCache;

/// Commands understood by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// put <key> <value...>
    Put { key: String, value: String },
    /// get <key>
    Get { key: String },
    /// delete <key>
    Delete { key: String },
    /// reset
    Reset,
    /// show
    Show,
    /// stats
    Stats,
    /// help
    Help,
    /// exit
    Exit,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for a blank line. The verb is case-insensitive and
    /// the value of `put` is the rest of the line.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };
        let verb = verb.to_lowercase();

        let command = match verb.as_str() {
            "put" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| wrong_arity("put"))?;
                Command::Put {
                    key: key.to_string(),
                    value: value.trim_start().to_string(),
                }
            }
            "get" => Command::Get {
                key: single_arg("get", rest)?,
            },
            "delete" | "del" => Command::Delete {
                key: single_arg("delete", rest)?,
            },
            "reset" => no_args("reset", rest, Command::Reset)?,
            "show" => no_args("show", rest, Command::Show)?,
            "stats" => no_args("stats", rest, Command::Stats)?,
            "help" => no_args("help", rest, Command::Help)?,
            "exit" | "quit" => no_args("exit", rest, Command::Exit)?,
            _ => return Err(format!("unknown command '{}'", verb)),
        };

        Ok(Some(command))
    }

    /// Whether running this command can change cache contents or order
    pub fn touches_cache(&self) -> bool {
        matches!(
            self,
            Command::Put { .. } | Command::Get { .. } | Command::Delete { .. } | Command::Reset
        )
    }
}

fn wrong_arity(command: &str) -> String {
    format!("wrong number of arguments for '{}' command", command)
}

fn single_arg(command: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(wrong_arity(command));
    }
    Ok(rest.to_string())
}

fn no_args(command: &str, rest: &str, parsed: Command) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(wrong_arity(command))
    }
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Command succeeded with nothing to report
    Ok,
    /// A looked-up or removed value, `None` when the key was absent
    Value(Option<String>),
    /// Free-form text
    Text(String),
    /// The session should end
    Exit,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(Some(value)) => write!(f, "{}", value),
            Reply::Value(None) => write!(f, "(nil)"),
            Reply::Text(text) => write!(f, "{}", text),
            Reply::Exit => Ok(()),
        }
    }
}

const HELP: &str = "\
commands:
  put <key> <value>   insert or update a key
  get <key>           print a value and mark it most recently used
  delete <key>        remove a key (alias: del)
  reset               remove every key
  show                print contents, most recently used first
  stats               print hit/miss and eviction counters
  help                print this message
  exit                leave the shell (alias: quit)";

/// Runs parsed commands against one cache
pub struct CommandHandler {
    cache: LruCache<String, String>,
}

impl CommandHandler {
    pub fn new(cache: LruCache<String, String>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &LruCache<String, String> {
        &self.cache
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::Put { key, value } => {
                self.cache.put(key, value);
                Reply::Ok
            }
            Command::Get { key } => Reply::Value(self.cache.get(key.as_str()).cloned()),
            Command::Delete { key } => Reply::Value(self.cache.delete(key.as_str())),
            Command::Reset => {
                self.cache.reset();
                Reply::Ok
            }
            Command::Show => Reply::Text(render(&self.cache)),
            Command::Stats => Reply::Text(format!(
                "{} size={}/{}",
                self.cache.stats(),
                self.cache.len(),
                self.cache.max_size()
            )),
            Command::Help => Reply::Text(HELP.to_string()),
            Command::Exit => Reply::Exit,
        }
    }
}

/// Render cache contents front to back, then the capacity
pub fn render(cache: &LruCache<String, String>) -> String {
    let mut text = String::from("------------------\nCurrent LRU Cache:\n");
    for (key, value) in cache.iter() {
        text.push_str(key);
        text.push(' ');
        text.push_str(value);
        text.push('\n');
    }
    text.push_str(&format!("Max capacity = {}", cache.max_size()));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(LruCache::new(capacity).unwrap())
    }

    fn run(handler: &mut CommandHandler, line: &str) -> Reply {
        let command = Command::parse(line).unwrap().unwrap();
        handler.handle(command)
    }

    #[test]
    fn test_parse_put_keeps_rest_of_line() {
        assert_eq!(
            Command::parse("PUT greeting hello  world").unwrap(),
            Some(Command::Put {
                key: "greeting".to_string(),
                value: "hello  world".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            Command::parse("del k").unwrap(),
            Some(Command::Delete {
                key: "k".to_string()
            })
        );
        assert_eq!(Command::parse("quit").unwrap(), Some(Command::Exit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("put onlykey").unwrap_err(),
            "wrong number of arguments for 'put' command"
        );
        assert!(Command::parse("get").is_err());
        assert!(Command::parse("get a b").is_err());
        assert!(Command::parse("reset now").is_err());
        assert_eq!(
            Command::parse("frobnicate").unwrap_err(),
            "unknown command 'frobnicate'"
        );
    }

    #[test]
    fn test_touches_cache() {
        assert!(Command::Reset.touches_cache());
        assert!(Command::Get { key: "k".into() }.touches_cache());
        assert!(!Command::Show.touches_cache());
        assert!(!Command::Stats.touches_cache());
    }

    #[test]
    fn test_handle_put_get_delete() {
        let mut h = handler(2);

        assert_eq!(run(&mut h, "put 1 a"), Reply::Ok);
        assert_eq!(run(&mut h, "get 1"), Reply::Value(Some("a".to_string())));
        assert_eq!(run(&mut h, "get 2"), Reply::Value(None));
        assert_eq!(run(&mut h, "delete 1"), Reply::Value(Some("a".to_string())));
        assert_eq!(run(&mut h, "delete 1"), Reply::Value(None));
        assert!(h.cache().is_empty());
    }

    #[test]
    fn test_handle_eviction_and_reset() {
        let mut h = handler(2);
        run(&mut h, "put 1 a");
        run(&mut h, "put 2 b");
        run(&mut h, "get 1");
        run(&mut h, "put 3 c");

        assert_eq!(run(&mut h, "get 2"), Reply::Value(None));

        assert_eq!(run(&mut h, "reset"), Reply::Ok);
        assert!(h.cache().is_empty());
        assert_eq!(h.cache().max_size(), 2);
    }

    #[test]
    fn test_render() {
        let mut h = handler(3);
        run(&mut h, "put a 1");
        run(&mut h, "put b 2");

        assert_eq!(
            render(h.cache()),
            "------------------\nCurrent LRU Cache:\nb 2\na 1\nMax capacity = 3"
        );
    }

    #[test]
    fn test_stats_reply() {
        let mut h = handler(2);
        run(&mut h, "put a 1");
        run(&mut h, "get a");
        run(&mut h, "get b");

        assert_eq!(
            run(&mut h, "stats").to_string(),
            "hits=1 misses=1 hit_ratio=0.50 inserts=1 updates=0 evictions=0 deletes=0 size=1/2"
        );
    }

    #[test]
    fn test_reply_display() {
        assert_eq!(Reply::Ok.to_string(), "OK");
        assert_eq!(Reply::Value(None).to_string(), "(nil)");
        assert_eq!(Reply::Value(Some("v".into())).to_string(), "v");
    }
}
