//! SQL schema for the message database.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout version for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS conversations (
    id                TEXT PRIMARY KEY,
    account_id        TEXT NOT NULL,
    platform          TEXT NOT NULL,
    title             TEXT NOT NULL,
    kind              TEXT NOT NULL,   -- 'single' | 'group'
    participant_count INTEGER NOT NULL DEFAULT 0,
    unread_count      INTEGER NOT NULL DEFAULT 0,
    last_activity     TEXT NOT NULL,   -- RFC 3339 UTC, millisecond precision
    archived          INTEGER NOT NULL DEFAULT 0,
    muted             INTEGER NOT NULL DEFAULT 0,
    pinned            INTEGER NOT NULL DEFAULT 0
);

-- Participant order is significant; rewritten wholesale on every save.
CREATE TABLE IF NOT EXISTS conversation_participants (
    conversation_id TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
    position        INTEGER NOT NULL,
    participant_id  TEXT NOT NULL,
    PRIMARY KEY (conversation_id, position)
);

CREATE TABLE IF NOT EXISTS messages (
    conversation_uid TEXT NOT NULL,
    id               TEXT NOT NULL,
    contact_uid      TEXT NOT NULL,
    timestamp        TEXT NOT NULL,   -- RFC 3339 UTC, millisecond precision
    sender_uid       TEXT NOT NULL,
    sender_name      TEXT NOT NULL,
    content          TEXT NOT NULL,
    platform         TEXT NOT NULL,
    platform_id      TEXT NOT NULL,
    is_sent          INTEGER NOT NULL DEFAULT 0,
    attachments      TEXT NOT NULL DEFAULT '[]',
    sort_key         TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (conversation_uid, id)
);

CREATE INDEX IF NOT EXISTS messages_order_idx
    ON messages(conversation_uid, timestamp, sort_key);
CREATE INDEX IF NOT EXISTS messages_contact_idx
    ON messages(contact_uid, timestamp);
CREATE INDEX IF NOT EXISTS participants_member_idx
    ON conversation_participants(participant_id);

PRAGMA user_version = 1;
";
