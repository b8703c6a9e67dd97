//! `webpilot run` — one task, one final answer.

use tracing::error;
use webpilot_config::AppConfig;
use webpilot_core::Error;

use super::build_session;

pub async fn run(task: String, headed: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let (mut session, driver) = build_session(&config, headed).await?;

    let outcome = session.handle(task).await;
    driver.close().await;

    match outcome {
        Ok(answer) => {
            println!("{answer}");
            Ok(())
        }
        Err(Error::BudgetExceeded { iterations }) => {
            error!(iterations, "The agent ran out of iteration budget");
            Err("iteration budget exceeded before a final answer; raise agent.max_iterations or simplify the task".into())
        }
        Err(e) => Err(e.into()),
    }
}
