//! `webpilot chat` — interactive session.

use std::io::{BufRead, Write};

use webpilot_config::AppConfig;
use webpilot_core::Error;

use super::build_session;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let (mut session, driver) = build_session(&config, false).await?;

    println!("webpilot chat — type a task, or 'exit' to quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "exit" || message == "quit" {
            break;
        }

        match session.handle(message).await {
            Ok(answer) => println!("{answer}"),
            Err(Error::BudgetExceeded { iterations }) => {
                println!("(gave up after {iterations} iterations — try rephrasing)");
            }
            Err(e) => {
                // Oracle and configuration failures end the session
                driver.close().await;
                return Err(e.into());
            }
        }
    }

    driver.close().await;
    Ok(())
}
