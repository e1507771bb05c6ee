use mazewalk::{app, settings::Settings};

fn main() -> std::io::Result<()> {
    // The terminal belongs to the game, so logs go to a file
    let file_appender = tracing_appender::rolling::never("logs", "mazewalk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let settings_path = Settings::default_path();
    let mut settings = Settings::load_or_default(&settings_path);

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout, &mut settings, &settings_path);
    app::restore_terminal(&mut stdout)?;

    if let Err(e) = &result {
        tracing::error!("[main] exited with error: {}", e);
    }
    result
}
