//! Share links
//!
//! Builds the public link of a document or template and puts it on a
//! [`Clipboard`].

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::Config;

/// What is being shared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareKind {
    Document,
    Template,
}

impl ShareKind {
    fn path_segment(self) -> &'static str {
        match self {
            ShareKind::Document => "documents",
            ShareKind::Template => "templates",
        }
    }

    /// Activity feed entry `(title, description)` for a shared item
    pub fn activity_text(self, title: &str) -> (&'static str, String) {
        match self {
            ShareKind::Document => ("Documento condiviso", format!("Hai condiviso \"{}\"", title)),
            ShareKind::Template => (
                "Template condiviso",
                format!("Hai condiviso il template \"{}\"", title),
            ),
        }
    }
}

/// Where copied links go
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> std::io::Result<()>;
}

/// In-process clipboard, keeps the last copied text
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.content.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> std::io::Result<()> {
        let mut content = self
            .content
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "clipboard poisoned"))?;
        *content = Some(text.to_string());
        Ok(())
    }
}

#[derive(Clone)]
pub struct ShareService {
    origin: String,
    clipboard: Arc<dyn Clipboard>,
}

impl ShareService {
    pub fn new(config: &Config, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            origin: config.share_origin.trim_end_matches('/').to_string(),
            clipboard,
        }
    }

    /// `{origin}/documents/{id}` or `{origin}/templates/{id}`
    pub fn link_for(&self, kind: ShareKind, id: &str) -> String {
        format!("{}/{}/{}", self.origin, kind.path_segment(), id)
    }

    /// Build the link and copy it; a clipboard failure is only logged
    pub fn share_link(&self, kind: ShareKind, id: &str) -> String {
        let link = self.link_for(kind, id);
        match self.clipboard.write_text(&link) {
            Ok(()) => info!("🔗 Link copiato: {}", link),
            Err(e) => warn!("⚠️ Copia del link non riuscita: {}", e),
        }
        link
    }
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(origin: &str) -> (ShareService, Arc<MemoryClipboard>) {
        let clipboard = Arc::new(MemoryClipboard::new());
        let config = Config {
            share_origin: origin.to_string(),
            ..Config::default()
        };
        (ShareService::new(&config, clipboard.clone()), clipboard)
    }

    #[test]
    fn test_share_document_copies_link() {
        let (share, clipboard) = service("https://hub.example.it/");
        let link = share.share_link(ShareKind::Document, "abc123xyz");
        assert_eq!(link, "https://hub.example.it/documents/abc123xyz");
        assert_eq!(clipboard.contents(), Some(link));
    }

    #[test]
    fn test_template_link_and_activity() {
        let (share, _) = service("http://localhost:3000");
        assert_eq!(
            share.link_for(ShareKind::Template, "7"),
            "http://localhost:3000/templates/7"
        );
        let (title, description) = ShareKind::Template.activity_text("Verifica Dante");
        assert_eq!(title, "Template condiviso");
        assert_eq!(description, "Hai condiviso il template \"Verifica Dante\"");
    }
}
