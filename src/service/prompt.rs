use async_trait::async_trait;
use inquire::Confirm;

/// User-facing confirmations and notices. Controllers never talk to the
/// terminal directly so tests can script the user's answers.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
    async fn notify(&self, message: &str);
}

pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new(&message).with_default(false).prompt()
        })
        .await;
        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(err)) => {
                tracing::debug!("confirmation aborted: {}", err);
                false
            }
            Err(err) => {
                tracing::error!("confirmation prompt failed: {}", err);
                false
            }
        }
    }

    async fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Answers every confirmation the same way; used for `--yes` runs.
pub struct AutoPrompter {
    pub answer: bool,
}

#[async_trait]
impl Prompter for AutoPrompter {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!("auto-answering {:?} with {}", message, self.answer);
        self.answer
    }

    async fn notify(&self, message: &str) {
        println!("{}", message);
    }
}
