use clilog::{debug, error, info, warn, Attr, CliHandler, Level, Logger, Style};

fn main() -> clilog::Result<()> {
    // Colors follow the terminal; try CLILOG_COLOR=always / never
    let presets = [
        ("style0", "NO COLOR:", Style::no_color()),
        ("style1", "BASIC FOREGROUND COLOR:", Style::basic_foreground()),
        ("style2", "VIVID FOREGROUND COLOR:", Style::vivid_foreground()),
        ("style3", "BASIC BACKGROUND COLOR:", Style::basic_background()),
        ("style4", "VIVID BACKGROUND COLOR:", Style::vivid_background()),
    ];

    for (group, label, style) in presets {
        println!();
        let h = CliHandler::builder()
            .stdout()
            .level(Level::DEBUG)
            .label(label)
            .show_time(true)
            .show_caller(true)
            .redact(|a| {
                if a.key == "password" {
                    Attr::string("password", "***")
                } else {
                    a
                }
            })
            .style(style)
            .from_env()
            .build()?;
        let lg = Logger::new(h.with_group(group).with_attrs(vec![
            Attr::string("version", "1.0.0"),
            Attr::string("password", "p@ssw0rd"),
        ]));

        debug!(lg, "debug message");
        info!(lg, "info message");
        warn!(lg, "warn message");
        error!(lg, [Attr::duration("after", std::time::Duration::from_millis(1500))], "error message");
    }
    println!();
    Ok(())
}
