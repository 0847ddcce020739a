//! Display model: one renderable interpretation of an input.
//!
//! A [`Display`] is either ready to show ([`StaticDisplay`]) or needs a
//! remote round trip first ([`InteractiveDisplay`]). The orchestrator is the
//! only place that matches on the two variants.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::priorities::Priority;

/// Identity and ordering data shared by both display variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMeta {
    /// Unique within one run; derived from `(input, tag[, network/coin])`.
    pub id: String,
    pub priority: Priority,
    pub interpreted_as: String,
    #[serde(default)]
    pub deprecated: bool,
}

impl DisplayMeta {
    pub fn new(id: impl Into<String>, priority: Priority, interpreted_as: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            priority,
            interpreted_as: interpreted_as.into(),
            deprecated: false,
        }
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }
}

/// One labelled row of a rendered display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
    /// Input string worth sniffing next, if the value points somewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Field {
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            link: None,
        }
    }

    /// A row whose value is itself a sniffable input.
    pub fn linked(label: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: label.into(),
            link: Some(value.clone()),
            value,
        }
    }

    /// A row showing `shown` (usually shortened) but linking to `target`.
    pub fn linked_as(
        label: impl Into<String>,
        shown: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: shown.into(),
            link: Some(target.into()),
        }
    }
}

/// Renderable content of a static display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DisplayData {
    /// Placeholder for an interactive display that has not resolved yet.
    Pending,
    Fields(Vec<Field>),
    /// The lookup succeeded but found nothing.
    NotFound(String),
    /// The lookup failed.
    Error(String),
}

impl DisplayData {
    pub fn is_pending(&self) -> bool {
        matches!(self, DisplayData::Pending)
    }
}

/// An interpretation that can be shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticDisplay {
    #[serde(flatten)]
    pub meta: DisplayMeta,
    pub data: DisplayData,
}

impl StaticDisplay {
    pub fn new(meta: DisplayMeta, data: DisplayData) -> Self {
        Self { meta, data }
    }

    pub fn fields(meta: DisplayMeta, fields: Vec<Field>) -> Self {
        Self::new(meta, DisplayData::Fields(fields))
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }
}

/// Remote half of an interactive display.
///
/// `fetch` does the I/O and may fail. `render` is pure and must turn every
/// successful result, including an explicit "not found", into data.
#[async_trait]
pub trait Lookup: Send + Sync + 'static {
    type Raw: Send;

    async fn fetch(&self) -> Result<Self::Raw>;

    fn render(&self, raw: Self::Raw) -> DisplayData;
}

/// Object-safe form of [`Lookup`] with the raw type erased.
#[async_trait]
pub trait ErasedLookup: Send + Sync {
    async fn resolve(&self) -> Result<DisplayData>;
}

#[async_trait]
impl<L: Lookup> ErasedLookup for L {
    async fn resolve(&self) -> Result<DisplayData> {
        let raw = self.fetch().await?;
        Ok(self.render(raw))
    }
}

/// An interpretation that needs a fetch before it can be rendered.
#[derive(Clone)]
pub struct InteractiveDisplay {
    pub meta: DisplayMeta,
    lookup: Arc<dyn ErasedLookup>,
}

impl InteractiveDisplay {
    pub fn new(meta: DisplayMeta, lookup: impl Lookup) -> Self {
        Self {
            meta,
            lookup: Arc::new(lookup),
        }
    }

    pub fn placeholder(&self) -> StaticDisplay {
        StaticDisplay::new(self.meta.clone(), DisplayData::Pending)
    }

    /// Runs the lookup. A failed fetch becomes an error display with the
    /// same identity rather than an `Err`.
    pub async fn resolve(&self) -> StaticDisplay {
        let data = match self.lookup.resolve().await {
            Ok(data) => data,
            Err(e) => DisplayData::Error(format!("{:#}", e)),
        };
        StaticDisplay::new(self.meta.clone(), data)
    }
}

impl fmt::Debug for InteractiveDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveDisplay")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Display {
    Static(StaticDisplay),
    Interactive(InteractiveDisplay),
}

impl Display {
    pub fn meta(&self) -> &DisplayMeta {
        match self {
            Display::Static(d) => &d.meta,
            Display::Interactive(d) => &d.meta,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    pub fn priority(&self) -> Priority {
        self.meta().priority
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Display::Interactive(_))
    }
}

impl From<StaticDisplay> for Display {
    fn from(d: StaticDisplay) -> Self {
        Display::Static(d)
    }
}

impl From<InteractiveDisplay> for Display {
    fn from(d: InteractiveDisplay) -> Self {
        Display::Interactive(d)
    }
}

/// Notification that one interactive display of a run has resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    pub generation: u64,
    pub id: String,
    pub display: StaticDisplay,
}

/// Shortens `s` to at most `max_len` characters by replacing its middle
/// with an ellipsis.
pub fn ellide_middle(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(1);
    let front = budget.div_ceil(2);
    let tail = budget / 2;
    let mut out: String = chars[..front].iter().collect();
    out.push('…');
    out.extend(&chars[chars.len() - tail..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Fixed(Option<u32>);

    #[async_trait]
    impl Lookup for Fixed {
        type Raw = Option<u32>;

        async fn fetch(&self) -> Result<Self::Raw> {
            Ok(self.0)
        }

        fn render(&self, raw: Self::Raw) -> DisplayData {
            match raw {
                Some(n) => DisplayData::Fields(vec![Field::text("Value", n.to_string())]),
                None => DisplayData::NotFound("Nothing here".to_string()),
            }
        }
    }

    struct Broken;

    #[async_trait]
    impl Lookup for Broken {
        type Raw = ();

        async fn fetch(&self) -> Result<()> {
            bail!("connection refused")
        }

        fn render(&self, _: ()) -> DisplayData {
            DisplayData::Fields(vec![])
        }
    }

    #[test]
    fn test_ellide_middle() {
        assert_eq!(ellide_middle("short", 10), "short");
        assert_eq!(ellide_middle("abcdefghij", 10), "abcdefghij");
        assert_eq!(ellide_middle("abcdefghijk", 6), "abc…jk");
        assert_eq!(ellide_middle("abcdefghijk", 5), "ab…jk");
    }

    #[tokio::test]
    async fn test_interactive_resolve_keeps_identity() {
        let meta = DisplayMeta::new("x#test", 9, "Test").deprecated(true);
        let display = InteractiveDisplay::new(meta.clone(), Fixed(Some(7)));

        let placeholder = display.placeholder();
        assert_eq!(placeholder.meta, meta);
        assert!(placeholder.data.is_pending());

        let resolved = display.resolve().await;
        assert_eq!(resolved.meta, meta);
        assert_eq!(
            resolved.data,
            DisplayData::Fields(vec![Field::text("Value", "7")])
        );
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_error() {
        let display = InteractiveDisplay::new(DisplayMeta::new("x#nf", 9, "Test"), Fixed(None));
        let resolved = display.resolve().await;
        assert_eq!(resolved.data, DisplayData::NotFound("Nothing here".into()));
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_error_data() {
        let display = InteractiveDisplay::new(DisplayMeta::new("x#err", 3, "Test"), Broken);
        let resolved = display.resolve().await;
        assert_eq!(resolved.id(), "x#err");
        assert_eq!(resolved.meta.priority, 3);
        assert_eq!(
            resolved.data,
            DisplayData::Error("connection refused".to_string())
        );
    }

    #[test]
    fn test_static_display_json_shape() {
        let display = StaticDisplay::fields(
            DisplayMeta::new("ab#hex-summary", 20, "Hex data summary"),
            vec![Field::linked("Lower", "ab")],
        );
        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["id"], "ab#hex-summary");
        assert_eq!(json["deprecated"], false);
        assert_eq!(json["data"]["kind"], "fields");
        assert_eq!(json["data"]["value"][0]["link"], "ab");
    }
}
