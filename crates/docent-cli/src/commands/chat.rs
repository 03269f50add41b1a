use std::io::{BufRead, Write};

use docent_lib::app::Assistant;
use docent_lib::output::ConsoleIO;
use docent_lib::runtime::Runtime;
use docent_lib::session::{ChatSession, Role};

const BANNER: &str =
    "Chat started. Type /new to start a new chat, /history to show it, /exit to quit.";

/// Run the `docent chat` command: one question per stdin line until `/exit` or EOF.
pub fn run_chat<IN, OUT, ERR>(
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let mut assistant = Assistant::build(runtime)?;
    let mut session = ChatSession::new();
    writeln!(io.stderr(), "{BANNER}")?;

    loop {
        write!(io.stderr(), "> ")?;
        io.stderr().flush()?;
        let Some(line) = io.read_line()? else {
            break;
        };

        match line.trim() {
            "" => {}
            "/exit" | "/quit" => break,
            "/new" => {
                session.reset();
                writeln!(io.stdout(), "Started a new chat.")?;
            }
            "/history" => {
                for turn in session.turns() {
                    writeln!(io.stdout(), "{}: {}", turn.role, turn.content)?;
                }
            }
            message => {
                session.push(Role::User, message);
                let answer = assistant.chat(message);
                writeln!(io.stdout(), "{answer}")?;
                session.push(Role::Assistant, answer);
            }
        }
    }
    Ok(())
}
