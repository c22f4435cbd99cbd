//! CLI channel: the profile form as a stdin/stdout dialogue.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::form::{ProfileField, ProfileForm};
use crate::messages;
use crate::render::render_view;
use crate::session::SearchController;

const NEW_SEARCH_PROMPT: &str = "¿Querés iniciar una nueva búsqueda? (s/n): ";

/// Terminal front end for one search session.
pub struct CliChannel<R, W> {
    controller: Arc<SearchController>,
    lines: Lines<R>,
    out: W,
    form: ProfileForm,
}

impl CliChannel<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// A channel bound to the process's stdin and stdout.
    pub fn stdio(controller: Arc<SearchController>) -> Self {
        Self::new(
            controller,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }
}

impl<R, W> CliChannel<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(controller: Arc<SearchController>, reader: R, writer: W) -> Self {
        Self {
            controller,
            lines: reader.lines(),
            out: writer,
            form: ProfileForm::new(0),
        }
    }

    /// Run form → search → result rounds until EOF or the user declines a
    /// new search. Returns the writer.
    pub async fn run(mut self) -> Result<W, ChannelError> {
        let mut view = self.controller.view().await;
        self.print(&render_view(&view)).await?;

        loop {
            self.form.sync_token(view.form_token);
            self.form.set_disabled(view.form_disabled);

            if !self.fill_form().await? {
                debug!("Input closed while filling the form");
                break;
            }

            let profile = self.form.submit().map_err(|e| self.io_error(e))?;
            self.form.set_disabled(true);
            self.print(messages::LOADING).await?;

            view = match self.controller.submit(profile).await {
                Ok(view) => view,
                Err(e) => {
                    warn!(error = %e, "Search did not complete");
                    self.controller.view().await
                }
            };
            self.form.set_disabled(view.form_disabled);
            self.print(&render_view(&view)).await?;

            if !self.confirm_new_search().await? {
                break;
            }
            view = self.controller.reset().await;
            self.print(&render_view(&view)).await?;
        }

        self.out.flush().await.map_err(|e| self.io_error(e))?;
        Ok(self.out)
    }

    /// Prompt for every field. Returns false on EOF.
    async fn fill_form(&mut self) -> Result<bool, ChannelError> {
        for field in ProfileField::ALL {
            self.write(&format!("{}: ", field.label())).await?;
            match self.read_line().await? {
                Some(value) => self.form.set(field, value).map_err(|e| self.io_error(e))?,
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    async fn confirm_new_search(&mut self) -> Result<bool, ChannelError> {
        self.write(NEW_SEARCH_PROMPT).await?;
        let answer = self.read_line().await?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "s" | "si" | "sí" | "y" | "yes"
        ))
    }

    async fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        self.lines.next_line().await.map_err(|e| self.io_error(e))
    }

    async fn print(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write(&format!("\n{text}\n\n")).await
    }

    async fn write(&mut self, text: &str) -> Result<(), ChannelError> {
        self.out
            .write_all(text.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        self.out.flush().await.map_err(|e| self.io_error(e))
    }

    fn io_error(&self, e: impl std::fmt::Display) -> ChannelError {
        ChannelError::Io {
            name: "cli".to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::RecommendError;
    use crate::schools::model::{School, UserProfile};
    use crate::schools::recommender::SchoolRecommender;

    struct Echo;

    #[async_trait]
    impl SchoolRecommender for Echo {
        async fn recommend(&self, profile: &UserProfile) -> Result<Vec<School>, RecommendError> {
            Ok(vec![School::new(
                format!("Escuela de {}", profile.likes),
                "",
                "",
                vec![],
            )])
        }
    }

    fn answers(likes: &str) -> String {
        ["16", "secundaria", "Centro", "10,22", "matemáticas", likes, "", "amigos"].join("\n")
    }

    async fn run(input: String) -> (String, Arc<SearchController>) {
        let controller = SearchController::new(Arc::new(Echo), Default::default());
        let channel = CliChannel::new(Arc::clone(&controller), input.as_bytes(), Vec::new());
        let out = channel.run().await.unwrap();
        (String::from_utf8(out).unwrap(), controller)
    }

    #[tokio::test]
    async fn one_round_then_decline() {
        let (out, controller) = run(format!("{}\nn\n", answers("robótica"))).await;

        assert!(out.contains(messages::WELCOME_TITLE));
        assert!(out.contains("Edad: "));
        assert!(out.contains(messages::LOADING));
        assert!(out.contains("1. Escuela de robótica"));
        assert!(out.contains(NEW_SEARCH_PROMPT));

        let state = controller.snapshot().await;
        assert!(state.has_searched());
        assert_eq!(state.form_token(), 0);
    }

    #[tokio::test]
    async fn new_search_resets_session_and_form() {
        let input = format!("{}\ns\n{}\nn\n", answers("robótica"), answers("música"));
        let (out, controller) = run(input).await;

        assert!(out.contains("1. Escuela de robótica"));
        assert!(out.contains("1. Escuela de música"));

        let state = controller.snapshot().await;
        assert_eq!(state.form_token(), 1);
        assert_eq!(state.results()[0].name, "Escuela de música");
    }

    #[tokio::test]
    async fn eof_mid_form_stops_without_search() {
        let (out, controller) = run("16\nsecundaria\n".to_string()).await;
        assert!(!out.contains(messages::LOADING));
        assert!(!controller.snapshot().await.has_searched());
    }
}
