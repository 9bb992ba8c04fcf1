//! Menu model shared by the coordinator and the tray front ends.
//!
//! Every item owns a bounded click queue. The front end only calls
//! [`MenuItem::click`]; the event loop drains the queues.

use super::Event;
use crate::state::{Source, Token};
use futures::stream::{self, BoxStream, SelectAll, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;

/// Pending clicks kept per item. A click beyond this is a usage error and
/// is rejected.
const CLICK_QUEUE_CAPACITY: usize = 32;

/// What clicking an item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Token(Token),
    Source(Source),
    Quit,
}

impl MenuAction {
    fn to_event(&self) -> Event {
        match self {
            Self::Token(token) => Event::TokenClicked(token.clone()),
            Self::Source(source) => Event::SourceClicked(*source),
            Self::Quit => Event::Quit,
        }
    }
}

/// A clickable menu entry.
#[derive(Debug)]
pub struct MenuItem {
    /// Text shown in the menu.
    pub label: String,
    /// Longer description.
    pub tooltip: String,
    /// What the item stands for.
    pub action: MenuAction,
    clicked: mpsc::Sender<()>,
}

impl MenuItem {
    /// Queue a click. Returns `false` if the item's queue is full or the
    /// menu is no longer serviced.
    pub fn click(&self) -> bool {
        match self.clicked.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                tracing::warn!(
                    item = %self.label,
                    pending = CLICK_QUEUE_CAPACITY,
                    "click queue full, click rejected"
                );
                false
            }
            Err(TrySendError::Closed(())) => {
                tracing::debug!(item = %self.label, "menu no longer serviced");
                false
            }
        }
    }
}

/// Entry of a [`Menu`].
#[derive(Debug)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

/// The tray menu.
#[derive(Debug, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    /// All entries in order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Clickable items in order, separators skipped.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator => None,
        })
    }

    /// Find the item for an action.
    pub fn item_for(&self, action: &MenuAction) -> Option<&MenuItem> {
        self.items().find(|item| &item.action == action)
    }
}

/// Receiving ends of every item's click queue.
#[derive(Default)]
pub struct ClickSources {
    receivers: Vec<(mpsc::Receiver<()>, MenuAction)>,
}

impl ClickSources {
    /// Number of click queues.
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    /// Check if there are no click queues.
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Merge every queue into one stream of events.
    pub fn into_stream(self) -> SelectAll<BoxStream<'static, Event>> {
        stream::select_all(self.receivers.into_iter().map(|(rx, action)| {
            ReceiverStream::new(rx)
                .map(move |()| action.to_event())
                .boxed()
        }))
    }
}

/// Builds a [`Menu`] together with its [`ClickSources`].
#[derive(Default)]
pub struct MenuBuilder {
    menu: Menu,
    clicks: ClickSources,
}

impl MenuBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn item(mut self, label: impl Into<String>, tooltip: impl Into<String>, action: MenuAction) -> Self {
        let (tx, rx) = mpsc::channel(CLICK_QUEUE_CAPACITY);
        self.clicks.receivers.push((rx, action.clone()));
        self.menu.entries.push(MenuEntry::Item(MenuItem {
            label: label.into(),
            tooltip: tooltip.into(),
            action,
            clicked: tx,
        }));
        self
    }

    /// Append a separator.
    pub fn separator(mut self) -> Self {
        self.menu.entries.push(MenuEntry::Separator);
        self
    }

    /// Finish building.
    pub fn build(self) -> (Menu, ClickSources) {
        (self.menu, self.clicks)
    }
}

/// The standard menu: catalog tokens, source selectors, quit.
pub fn build_menu(catalog: &[Token]) -> (Menu, ClickSources) {
    let mut builder = MenuBuilder::new();
    for token in catalog {
        builder = builder.item(&token.symbol, &token.name, MenuAction::Token(token.clone()));
    }

    builder = builder.separator();
    for source in Source::ALL {
        builder = builder.item(source.label(), "", MenuAction::Source(source));
    }

    builder
        .separator()
        .item("Quit", "Close the app", MenuAction::Quit)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<Token> {
        vec![
            Token::new("bitcoin", "BTC", "Bitcoin"),
            Token::new("ethereum", "ETH", "Ethereum"),
        ]
    }

    #[test]
    fn test_menu_layout() {
        let (menu, clicks) = build_menu(&catalog());
        let labels: Vec<&str> = menu.items().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["BTC", "ETH", "coincap", "binance", "Quit"]);
        assert_eq!(menu.entries().len(), 7);
        assert_eq!(clicks.len(), 5);
        assert_eq!(menu.items().next().unwrap().tooltip, "Bitcoin");
    }

    #[tokio::test]
    async fn test_clicks_become_events() {
        let (menu, clicks) = build_menu(&catalog());
        let mut events = clicks.into_stream();

        assert!(menu.item_for(&MenuAction::Source(Source::Binance)).unwrap().click());
        assert!(matches!(
            events.next().await,
            Some(Event::SourceClicked(Source::Binance))
        ));

        let eth = MenuAction::Token(Token::new("ethereum", "ETH", "Ethereum"));
        assert!(menu.item_for(&eth).unwrap().click());
        match events.next().await {
            Some(Event::TokenClicked(token)) => assert_eq!(token.id, "ethereum"),
            other => panic!("unexpected event: {other:?}"),
        }

        // nothing else pending
        let mut next = tokio_test::task::spawn(events.next());
        tokio_test::assert_pending!(next.poll());
    }

    #[tokio::test]
    async fn test_click_queue_is_bounded() {
        let (menu, _clicks) = build_menu(&catalog());
        let quit = menu.item_for(&MenuAction::Quit).unwrap();
        for _ in 0..CLICK_QUEUE_CAPACITY {
            assert!(quit.click());
        }
        assert!(!quit.click());
    }

    #[tokio::test]
    async fn test_rapid_clicks_are_queued() {
        let (menu, clicks) = build_menu(&catalog());
        let mut events = clicks.into_stream();
        let btc = menu
            .item_for(&MenuAction::Token(Token::new("bitcoin", "BTC", "Bitcoin")))
            .unwrap();

        assert!(btc.click());
        assert!(btc.click());

        for _ in 0..2 {
            match events.next().await {
                Some(Event::TokenClicked(token)) => assert_eq!(token.id, "bitcoin"),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_stream_ends_when_menu_dropped() {
        let (menu, clicks) = build_menu(&[]);
        let mut events = clicks.into_stream();
        drop(menu);
        assert!(events.next().await.is_none());
    }
}
