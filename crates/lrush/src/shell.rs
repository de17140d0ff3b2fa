//! Line-oriented read/eval/print loop

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::handler::{render, Command, CommandHandler, Reply};

const PROMPT: &str = "lru> ";

/// Write `prompt` (if any) and read one line without its line ending
///
/// Returns `None` at end of input.
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: Option<&str>,
) -> io::Result<Option<String>> {
    if let Some(prompt) = prompt {
        write!(out, "{}", prompt)?;
        out.flush()?;
    }

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Run commands from `input` until `exit` or end of input
///
/// Unless `quiet`, prompts are written and the cache is rendered on start
/// and after every command that touches it.
pub fn run<R: BufRead, W: Write>(
    handler: &mut CommandHandler,
    input: &mut R,
    out: &mut W,
    quiet: bool,
) -> io::Result<()> {
    let prompt = if quiet { None } else { Some(PROMPT) };

    if !quiet {
        writeln!(out, "{}", render(handler.cache()))?;
    }

    while let Some(line) = read_line(input, out, prompt)? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("Parse error: {}", e);
                writeln!(out, "ERR {}", e)?;
                continue;
            }
        };

        debug!(?command, "handling command");
        let touches_cache = command.touches_cache();
        let reply = handler.handle(command);
        if reply == Reply::Exit {
            break;
        }

        writeln!(out, "{}", reply)?;
        if touches_cache && !quiet {
            writeln!(out, "{}", render(handler.cache()))?;
        }
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrucache::LruCache;
    use std::io::Cursor;

    fn session(capacity: usize, script: &str, quiet: bool) -> String {
        let mut handler = CommandHandler::new(LruCache::new(capacity).unwrap());
        let mut input = Cursor::new(script.as_bytes());
        let mut out = Vec::new();
        run(&mut handler, &mut input, &mut out, quiet).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_read_line_strips_line_ending() {
        let mut input = Cursor::new("abc\r\nnext\n".as_bytes());
        let mut out = Vec::new();

        let line = read_line(&mut input, &mut out, Some("> ")).unwrap();
        assert_eq!(line.as_deref(), Some("abc"));
        assert_eq!(out, b"> ");

        let line = read_line(&mut input, &mut out, None).unwrap();
        assert_eq!(line.as_deref(), Some("next"));
        assert_eq!(read_line(&mut input, &mut out, None).unwrap(), None);
    }

    #[test]
    fn test_quiet_session() {
        let output = session(
            2,
            "put 1 a\nput 2 b\nput 3 c\nget 1\nget 2\n\nbogus\nexit\nget 3\n",
            true,
        );

        assert_eq!(
            output,
            "OK\nOK\nOK\n(nil)\nb\nERR unknown command 'bogus'\n"
        );
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let output = session(1, "put k v\nget k", true);
        assert_eq!(output, "OK\nv\n");
    }

    #[test]
    fn test_interactive_session_renders_after_changes() {
        let output = session(2, "put a 1\nstats\nexit\n", false);

        let expected = "\
------------------
Current LRU Cache:
Max capacity = 2
lru> OK
------------------
Current LRU Cache:
a 1
Max capacity = 2
lru> hits=0 misses=0 hit_ratio=0.00 inserts=1 updates=0 evictions=0 deletes=0 size=1/2
lru> ";
        assert_eq!(output, expected);
    }
}
