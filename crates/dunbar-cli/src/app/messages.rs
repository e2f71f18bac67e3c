//! Conversation browser: a list with a preview pane, and a scrollable
//! message detail view laid out by [`crate::viewport`].

use chrono::{Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent};
use dunbar_core::{
  message::{Conversation, Message},
  source::MessageSource,
};
use dunbar_sync::MessageManager;
use ratatui::{Frame, layout::Rect};
use tracing::debug;

use super::{Interactive, is_quit};
use crate::{
  confirm::{ConfirmOutcome, DeleteConfirm},
  render::{MessageRenderer, truncate_preview},
  timeline::Entry,
  ui,
  viewport::{ListViewport, MessageViewport, Sheet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  ConversationList,
  MessageDetail,
}

pub struct MessagesApp<S, Tz: TimeZone = Local> {
  pub screen:           Screen,
  /// Newest activity first.
  pub conversations:    Vec<Conversation>,
  pub list:             ListViewport,
  /// Messages of the highlighted conversation, text shortened for the pane.
  pub preview:          Vec<Message>,
  pub preview_timeline: Vec<Entry>,
  /// Id of the conversation shown in the detail view.
  pub open:             Option<String>,
  pub messages:         Vec<Message>,
  pub timeline:         Vec<Entry>,
  pub viewport:         MessageViewport,
  pub confirm:          Option<DeleteConfirm>,
  pub status_msg:       String,
  pub area:             Rect,
  pub renderer:         MessageRenderer<Tz>,
  manager:              MessageManager<S>,
}

/// Lay out `messages` inside `body`.
pub fn sheet<'a, Tz: TimeZone>(
  messages: &'a [Message],
  timeline: &'a [Entry],
  renderer: &'a MessageRenderer<Tz>,
  body: Rect,
) -> Sheet<'a, MessageRenderer<Tz>> {
  Sheet { messages, timeline, measure: renderer, width: body.width, height: body.height.into() }
}

impl<S: MessageSource> MessagesApp<S> {
  pub fn new(manager: MessageManager<S>) -> Self {
    Self::with_renderer(manager, MessageRenderer::local())
  }
}

impl<S: MessageSource, Tz: TimeZone> MessagesApp<S, Tz> {
  pub fn with_renderer(manager: MessageManager<S>, renderer: MessageRenderer<Tz>) -> Self {
    Self {
      screen: Screen::ConversationList,
      conversations: Vec::new(),
      list: ListViewport::default(),
      preview: Vec::new(),
      preview_timeline: Vec::new(),
      open: None,
      messages: Vec::new(),
      timeline: Vec::new(),
      viewport: MessageViewport::default(),
      confirm: None,
      status_msg: String::new(),
      area: Rect::new(0, 0, 80, 24),
      renderer,
      manager,
    }
  }

  pub async fn load(&mut self) -> anyhow::Result<()> {
    let mut conversations = self.manager.conversations().await?;
    conversations.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    self.conversations = conversations;
    self.list = ListViewport::default();
    self.load_preview().await;
    Ok(())
  }

  pub fn selected(&self) -> Option<&Conversation> { self.conversations.get(self.list.cursor) }

  fn list_rows(&self) -> usize { ui::messages::list_rows(self.area) }

  // ── Loading ─────────────────────────────────────────────────────────────

  async fn load_preview(&mut self) {
    self.preview.clear();
    self.preview_timeline.clear();
    let Some(id) = self.selected().map(|c| c.id.clone()) else {
      return;
    };
    match self.manager.messages_for_conversation(&id).await {
      Ok(mut messages) => {
        for m in &mut messages {
          m.content = truncate_preview(&m.content);
        }
        self.preview_timeline = self.renderer.timeline(&messages);
        self.preview = messages;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn open_selected(&mut self) {
    let Some(id) = self.selected().map(|c| c.id.clone()) else {
      return;
    };
    match self.manager.messages_for_conversation(&id).await {
      Ok(messages) => {
        self.timeline = self.renderer.timeline(&messages);
        self.messages = messages;
        self.viewport = MessageViewport::default();
        self.open = Some(id);
        self.screen = Screen::MessageDetail;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn back(&mut self) {
    self.screen = Screen::ConversationList;
    self.open = None;
    self.messages.clear();
    self.timeline.clear();
    self.viewport = MessageViewport::default();
  }

  // ── Keys ────────────────────────────────────────────────────────────────

  async fn handle_confirm_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(outcome) = self.confirm.as_ref().and_then(|c| c.handle_key(key)) else {
      return Ok(true);
    };
    self.confirm = None;

    if let ConfirmOutcome::DeleteConfirmed(id) = outcome {
      match self.manager.delete_conversation(&id).await {
        Ok(()) => {
          debug!(%id, "conversation deleted from browser");
          self.conversations.retain(|c| c.id != id);
          if self.open.as_deref() == Some(id.as_str()) {
            self.back();
          }
          self.list.clamp(self.conversations.len(), self.list_rows());
          self.status_msg = "Conversation deleted.".into();
          self.load_preview().await;
        }
        Err(e) => self.status_msg = format!("Error: {e}"),
      }
    }
    Ok(true)
  }

  fn request_delete(&mut self) {
    let target = match self.screen {
      Screen::ConversationList => self.selected(),
      Screen::MessageDetail => {
        let open = self.open.as_deref();
        self.conversations.iter().find(|c| Some(c.id.as_str()) == open)
      }
    };
    if let Some(conversation) = target {
      self.confirm = Some(DeleteConfirm::new(&conversation.id, &conversation.title));
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    let len = self.conversations.len();
    let rows = self.list_rows();
    let before = self.list.cursor;
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => self.list.down(len, rows),
      KeyCode::Up | KeyCode::Char('k') => self.list.up(),
      KeyCode::Home | KeyCode::Char('g') => self.list.home(),
      KeyCode::End | KeyCode::Char('G') => self.list.end(len, rows),
      KeyCode::PageUp => self.list.page_up(rows),
      KeyCode::PageDown => self.list.page_down(len, rows),

      KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.open_selected().await,
      KeyCode::Char('d') => self.request_delete(),

      _ => {}
    }
    if self.list.cursor != before {
      self.load_preview().await;
    }
    true
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    let body = ui::messages::detail_body(self.area);
    let sheet = sheet(&self.messages, &self.timeline, &self.renderer, body);
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => self.back(),

      KeyCode::Down | KeyCode::Char('j') => self.viewport.down(&sheet),
      KeyCode::Up | KeyCode::Char('k') => self.viewport.up(),
      KeyCode::Home | KeyCode::Char('g') => self.viewport.home(),
      KeyCode::End | KeyCode::Char('G') => self.viewport.end(&sheet),
      KeyCode::PageUp => self.viewport.page_up(&sheet),
      KeyCode::PageDown => self.viewport.page_down(&sheet),

      KeyCode::Char('d') => self.request_delete(),

      _ => {}
    }
  }
}

impl<S: MessageSource, Tz: TimeZone> Interactive for MessagesApp<S, Tz> {
  fn draw(&self, f: &mut Frame) { ui::messages::draw(f, self); }

  fn resize(&mut self, area: Rect) {
    self.area = area;
    self.list.clamp(self.conversations.len(), self.list_rows());
    if self.screen == Screen::MessageDetail {
      let body = ui::messages::detail_body(area);
      let sheet = sheet(&self.messages, &self.timeline, &self.renderer, body);
      self.viewport.clamp_cursor(&sheet);
    }
  }

  async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if is_quit(&key) {
      return Ok(false);
    }
    if self.confirm.is_some() {
      return self.handle_confirm_key(key).await;
    }
    self.status_msg.clear();
    match self.screen {
      Screen::ConversationList => Ok(self.handle_list_key(key).await),
      Screen::MessageDetail => {
        self.handle_detail_key(key);
        Ok(true)
      }
    }
  }
}
