use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use indoc::indoc;
use tracing::info;

use term_console::debug_log::{self, DebugLogHandle};
use term_console::dom::{Document, El, NodeKind};
use term_console::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_console::markup;
use term_console::runner::run_console_app;
use term_console::{Console, OptionsPatch, Theme, tracing_sub};

const HOST_ID: &str = "console-container";
const POLL_INTERVAL: Duration = Duration::from_millis(16);

const INTRO: &str = indoc! {"
    term-console demo page. The panel below is a live console: type `help`
    and press Enter to list commands. Drag the header to float the panel,
    double-click the header to put it back, and drag the bottom-right grip
    to resize it.
"};

const OUTRO: &str = indoc! {"
    Page content continues below the console. Scroll the wheel outside the
    panel to move the page; inside the panel the wheel scrolls the output.
    Ctrl+Q quits.
"};

#[derive(Parser, Debug)]
#[command(
    name = "term-console",
    version = env!("CARGO_PKG_VERSION"),
    about = "Embeddable developer console panel, shown on a sample page"
)]
struct Cli {
    /// Initial theme: light, dark or colorful.
    #[arg(long, value_name = "THEME", value_parser = parse_theme)]
    theme: Option<Theme>,

    /// Font size stored on the output and input styles.
    #[arg(long, value_name = "SIZE")]
    font_size: Option<String>,

    /// Font family stored on the output and input styles.
    #[arg(long, value_name = "FAMILY")]
    font_family: Option<String>,

    /// Start with dragging disabled.
    #[arg(long)]
    no_drag: bool,

    /// Start with resizing disabled.
    #[arg(long)]
    no_resize: bool,

    /// Id of the page node to mount the console into.
    #[arg(long, value_name = "ID", default_value = HOST_ID)]
    host: String,

    /// Print the captured log to stderr on exit.
    #[arg(long)]
    dump_log: bool,
}

impl Cli {
    fn options(&self) -> OptionsPatch {
        OptionsPatch {
            font_size: self.font_size.clone(),
            font_family: self.font_family.clone(),
            theme: self.theme,
        }
    }
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let log = DebugLogHandle::default();
    debug_log::set_global_debug_log(log.clone());
    debug_log::install_panic_hook();
    tracing_sub::init_default();

    let mut console = Console::mount(sample_page(), Some(&cli.host), Some(cli.options()))
        .map_err(io::Error::other)?;
    if cli.no_drag {
        console.toggle_draggable(Some(false));
    }
    if cli.no_resize {
        console.toggle_resizable(Some(false));
    }
    register_sample_commands(&mut console);
    console.append_to_console("Welcome to term-console.");
    console.append_to_console("Type `help` to list commands.");
    info!(host = %cli.host, "console mounted");

    let mut input = ConsoleInputDriver::new();
    let mut output = ConsoleOutputDriver::new()?;
    let (width, height) = output.size()?;
    console.document_mut().set_viewport(width, height);

    let result = run_console_app(
        &mut input,
        &mut output,
        &mut console,
        POLL_INTERVAL,
        |_, _| false,
    );
    drop(output);

    if cli.dump_log {
        for line in log.lines() {
            eprintln!("{line}");
        }
    }
    result
}

fn sample_page() -> Document {
    let mut doc = Document::default();
    let root = doc.root();
    El::new(NodeKind::Paragraph)
        .text(INTRO.trim_end())
        .mount(&mut doc, root);
    El::new(NodeKind::Block).id(HOST_ID).mount(&mut doc, root);
    El::new(NodeKind::Paragraph)
        .text(OUTRO.trim_end())
        .mount(&mut doc, root);
    doc
}

fn register_sample_commands(console: &mut Console) {
    console.add_command("hello", |c: &mut Console| {
        c.append_to_console("Hello, world!");
        Ok(())
    });
    console.add_command("time", |c: &mut Console| {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let (h, m, s) = ((secs / 3600) % 24, (secs / 60) % 60, secs % 60);
        c.append_to_console(&format!("Current time: {h:02}:{m:02}:{s:02} UTC"));
        Ok(())
    });
    console.add_command("test", |c: &mut Console| {
        c.append_to_console("Test command executed successfully.");
        Ok(())
    });
    console.add_command("fail", |_: &mut Console| Err("this command always fails".into()));
    console.add_command("demo", |c: &mut Console| {
        c.append_to_console("Plain output line.");
        c.append_to_console(&markup::error("An error line, rendered in red."));
        c.append_to_console(&format!(
            "Markup is escaped when echoed: {}",
            markup::escape("<error>")
        ));
        Ok(())
    });
    console.add_command("theme", |c: &mut Console| {
        let next = c.options().theme.next();
        c.update_options(OptionsPatch::theme(next));
        c.append_to_console(&format!("Theme: {next}"));
        Ok(())
    });
    console.add_command("drag", |c: &mut Console| {
        c.toggle_draggable(None);
        let state = if c.is_draggable() { "on" } else { "off" };
        c.append_to_console(&format!("Dragging {state}"));
        Ok(())
    });
    console.add_command("resize", |c: &mut Console| {
        c.toggle_resizable(None);
        let state = if c.is_resizable() { "on" } else { "off" };
        c.append_to_console(&format!("Resizing {state}"));
        Ok(())
    });
}
