use serde::Serialize;

use crate::window::WindowCapabilities;

/// A value published by the core for the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Payload {
    /// The tracked foreground window's title.
    TitleChanged(String),
    /// The tracked foreground window's maximize/minimize capabilities.
    CapabilitiesChanged(WindowCapabilities),
    /// `true` when a fullscreen application took over, `false` when it left.
    FullscreenToggled(bool),
}

/// Discriminant used to subscribe to one kind of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    TitleChanged,
    CapabilitiesChanged,
    FullscreenToggled,
}

impl PayloadKind {
    pub const ALL: [Self; 3] = [
        Self::TitleChanged,
        Self::CapabilitiesChanged,
        Self::FullscreenToggled,
    ];
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::TitleChanged(_) => PayloadKind::TitleChanged,
            Self::CapabilitiesChanged(_) => PayloadKind::CapabilitiesChanged,
            Self::FullscreenToggled(_) => PayloadKind::FullscreenToggled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let payload = Payload::CapabilitiesChanged(WindowCapabilities {
            is_maximized: true,
            is_maximizable: true,
            is_minimizable: false,
        });

        let json = serde_json::to_string(&payload).unwrap();

        assert_eq!(
            json,
            r#"{"kind":"CapabilitiesChanged","value":{"is_maximized":true,"is_maximizable":true,"is_minimizable":false}}"#
        );
    }

    #[test]
    fn title_payload_serializes_text() {
        let json = serde_json::to_string(&Payload::TitleChanged("Notes".into())).unwrap();
        assert_eq!(json, r#"{"kind":"TitleChanged","value":"Notes"}"#);
    }
}
