// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message store operations.

use rusqlite::{params, params_from_iter, Row};

use standin_core::types::{ChatMessage, MessageFilter};
use standin_core::StandinError;

use crate::database::{map_tr_err, Database};

const COLUMNS: &str = "provider_message_id, team_id, channel_id, channel_name, user_id, \
                       user_name, text, kind, subtype, ts, thread_ts, client_msg_id, \
                       is_bot, is_ai_generated, created_at";

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        provider_message_id: row.get(0)?,
        team_id: row.get(1)?,
        channel_id: row.get(2)?,
        channel_name: row.get(3)?,
        user_id: row.get(4)?,
        user_name: row.get(5)?,
        text: row.get(6)?,
        kind: row.get(7)?,
        subtype: row.get(8)?,
        ts: row.get(9)?,
        thread_ts: row.get(10)?,
        client_msg_id: row.get(11)?,
        is_bot: row.get(12)?,
        is_ai_generated: row.get(13)?,
        created_at: row.get(14)?,
    })
}

/// Insert a new message.
///
/// The unique index on `provider_message_id` is the authoritative dedup
/// guard; a second insert of the same message maps to
/// [`StandinError::Duplicate`] rather than a generic storage error.
pub async fn insert_message(db: &Database, msg: &ChatMessage) -> Result<(), StandinError> {
    let provider_message_id = msg.provider_message_id.clone();
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (provider_message_id, team_id, channel_id, channel_name,
                                       user_id, user_name, text, kind, subtype, ts, thread_ts,
                                       client_msg_id, is_bot, is_ai_generated, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    msg.provider_message_id,
                    msg.team_id,
                    msg.channel_id,
                    msg.channel_name,
                    msg.user_id,
                    msg.user_name,
                    msg.text,
                    msg.kind,
                    msg.subtype,
                    msg.ts,
                    msg.thread_ts,
                    msg.client_msg_id,
                    msg.is_bot,
                    msg.is_ai_generated,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| match &e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(f, _))
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StandinError::Duplicate {
                    provider_message_id,
                }
            }
            _ => map_tr_err(e),
        })
}

/// Get a message by its provider-assigned id.
pub async fn get_message(
    db: &Database,
    provider_message_id: &str,
) -> Result<Option<ChatMessage>, StandinError> {
    let provider_message_id = provider_message_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM messages WHERE provider_message_id = ?1"
            ))?;
            let result = stmt.query_row(params![provider_message_id], row_to_message);
            match result {
                Ok(msg) => Ok(Some(msg)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

fn validate_page(skip: i64, limit: i64) -> Result<(), StandinError> {
    if skip < 0 {
        return Err(StandinError::Validation(format!(
            "skip must be non-negative, got {skip}"
        )));
    }
    if limit <= 0 || limit > 1000 {
        return Err(StandinError::Validation(format!(
            "limit must be between 1 and 1000, got {limit}"
        )));
    }
    Ok(())
}

fn filter_clause(filter: &MessageFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut args = Vec::new();
    if let Some(team_id) = &filter.team_id {
        args.push(team_id.clone());
        clauses.push(format!("team_id = ?{}", args.len()));
    }
    if let Some(channel_id) = &filter.channel_id {
        args.push(channel_id.clone());
        clauses.push(format!("channel_id = ?{}", args.len()));
    }
    if let Some(user_id) = &filter.user_id {
        args.push(user_id.clone());
        clauses.push(format!("user_id = ?{}", args.len()));
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_sql, args)
}

/// List messages in reverse chronological order with offset pagination.
///
/// Pagination bounds are rejected, never clamped: `skip` must be
/// non-negative and `limit` must be in `[1, 1000]`.
pub async fn list_messages(
    db: &Database,
    filter: &MessageFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<ChatMessage>, StandinError> {
    validate_page(skip, limit)?;
    let (where_sql, args) = filter_clause(filter);
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {COLUMNS} FROM messages{where_sql} ORDER BY ts DESC LIMIT ?{} OFFSET ?{}",
                args.len() + 1,
                args.len() + 2,
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut params: Vec<Box<dyn rusqlite::ToSql>> = args
                .into_iter()
                .map(|a| Box::new(a) as Box<dyn rusqlite::ToSql>)
                .collect();
            params.push(Box::new(limit));
            params.push(Box::new(skip));
            let rows = stmt.query_map(params_from_iter(params.iter().map(|p| p.as_ref())), row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Count messages matching the same filters as [`list_messages`].
pub async fn count_messages(db: &Database, filter: &MessageFilter) -> Result<i64, StandinError> {
    let (where_sql, args) = filter_clause(filter);
    db.connection()
        .call(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM messages{where_sql}");
            let mut stmt = conn.prepare(&sql)?;
            let count = stmt.query_row(params_from_iter(args.iter()), |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent messages in a channel, excluding one message by id.
///
/// Used for conversation context: the message being analyzed must not
/// appear in its own context window.
pub async fn recent_channel_messages(
    db: &Database,
    channel_id: &str,
    exclude_provider_message_id: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>, StandinError> {
    let channel_id = channel_id.to_string();
    let exclude = exclude_provider_message_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM messages
                 WHERE channel_id = ?1 AND provider_message_id != ?2
                 ORDER BY ts DESC LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![channel_id, exclude, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent messages authored by one user, newest first.
pub async fn recent_user_messages(
    db: &Database,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>, StandinError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM messages WHERE user_id = ?1 ORDER BY ts DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![user_id, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent messages across all channels, newest first.
///
/// Fallback source for style examples when no principal user id is
/// configured.
pub async fn recent_messages(db: &Database, limit: i64) -> Result<Vec<ChatMessage>, StandinError> {
    let filter = MessageFilter::default();
    list_messages(db, &filter, 0, limit).await
}

/// Backfill the display name on all messages from one user.
///
/// Returns the number of rows updated.
pub async fn update_display_name(
    db: &Database,
    user_id: &str,
    user_name: &str,
) -> Result<usize, StandinError> {
    let user_id = user_id.to_string();
    let user_name = user_name.to_string();
    db.connection()
        .call(move |conn| {
            let updated = conn.execute(
                "UPDATE messages SET user_name = ?1 WHERE user_id = ?2",
                params![user_name, user_id],
            )?;
            Ok(updated)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_msg(id: &str, channel: &str, user: &str, ts: &str) -> ChatMessage {
        ChatMessage {
            provider_message_id: id.to_string(),
            team_id: "T1".to_string(),
            channel_id: channel.to_string(),
            channel_name: Some("general".to_string()),
            user_id: user.to_string(),
            user_name: None,
            text: format!("message {id}"),
            kind: "message".to_string(),
            subtype: None,
            ts: ts.to_string(),
            thread_ts: None,
            client_msg_id: Some(id.to_string()),
            is_bot: false,
            is_ai_generated: false,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trips() {
        let (db, _dir) = setup_db().await;
        let msg = make_msg("m1", "C1", "U1", "1700000001.000100");

        insert_message(&db, &msg).await.unwrap();
        let retrieved = get_message(&db, "m1").await.unwrap().unwrap();
        assert_eq!(retrieved, msg);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_message(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_insert_maps_to_duplicate_error() {
        let (db, _dir) = setup_db().await;
        let msg = make_msg("m1", "C1", "U1", "1700000001.000100");

        insert_message(&db, &msg).await.unwrap();
        let err = insert_message(&db, &msg).await.unwrap_err();
        match err {
            StandinError::Duplicate {
                provider_message_id,
            } => assert_eq!(provider_message_id, "m1"),
            other => panic!("expected Duplicate, got {other:?}"),
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_orders_newest_first_and_paginates() {
        let (db, _dir) = setup_db().await;
        for i in 1..=5 {
            let msg = make_msg(&format!("m{i}"), "C1", "U1", &format!("170000000{i}.000100"));
            insert_message(&db, &msg).await.unwrap();
        }

        let filter = MessageFilter::default();
        let page = list_messages(&db, &filter, 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].provider_message_id, "m5");
        assert_eq!(page[1].provider_message_id, "m4");

        let page = list_messages(&db, &filter, 2, 2).await.unwrap();
        assert_eq!(page[0].provider_message_id, "m3");
        assert_eq!(page[1].provider_message_id, "m2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_filters_are_conjunctive() {
        let (db, _dir) = setup_db().await;
        insert_message(&db, &make_msg("m1", "C1", "U1", "1700000001.000100"))
            .await
            .unwrap();
        insert_message(&db, &make_msg("m2", "C1", "U2", "1700000002.000100"))
            .await
            .unwrap();
        insert_message(&db, &make_msg("m3", "C2", "U1", "1700000003.000100"))
            .await
            .unwrap();

        let filter = MessageFilter {
            channel_id: Some("C1".to_string()),
            user_id: Some("U1".to_string()),
            ..Default::default()
        };
        let page = list_messages(&db, &filter, 0, 100).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].provider_message_id, "m1");

        assert_eq!(count_messages(&db, &filter).await.unwrap(), 1);
        assert_eq!(
            count_messages(&db, &MessageFilter::default()).await.unwrap(),
            3
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pagination_bounds_are_rejected_not_clamped() {
        let (db, _dir) = setup_db().await;
        let filter = MessageFilter::default();

        for (skip, limit) in [(-1, 10), (0, 0), (0, -5), (0, 1001)] {
            let err = list_messages(&db, &filter, skip, limit).await.unwrap_err();
            assert!(
                matches!(err, StandinError::Validation(_)),
                "expected Validation for skip={skip} limit={limit}, got {err:?}"
            );
        }

        // Boundary values are accepted.
        list_messages(&db, &filter, 0, 1).await.unwrap();
        list_messages(&db, &filter, 0, 1000).await.unwrap();

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn recent_channel_messages_excludes_the_current_message() {
        let (db, _dir) = setup_db().await;
        for i in 1..=3 {
            insert_message(&db, &make_msg(&format!("m{i}"), "C1", "U1", &format!("170000000{i}.000100")))
                .await
                .unwrap();
        }

        let context = recent_channel_messages(&db, "C1", "m3", 10).await.unwrap();
        assert_eq!(context.len(), 2);
        assert!(context.iter().all(|m| m.provider_message_id != "m3"));
        assert_eq!(context[0].provider_message_id, "m2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_display_name_backfills_all_rows() {
        let (db, _dir) = setup_db().await;
        insert_message(&db, &make_msg("m1", "C1", "U1", "1700000001.000100"))
            .await
            .unwrap();
        insert_message(&db, &make_msg("m2", "C1", "U1", "1700000002.000100"))
            .await
            .unwrap();
        insert_message(&db, &make_msg("m3", "C1", "U2", "1700000003.000100"))
            .await
            .unwrap();

        let updated = update_display_name(&db, "U1", "Alice").await.unwrap();
        assert_eq!(updated, 2);
        let msg = get_message(&db, "m1").await.unwrap().unwrap();
        assert_eq!(msg.user_name.as_deref(), Some("Alice"));
        let other = get_message(&db, "m3").await.unwrap().unwrap();
        assert!(other.user_name.is_none());

        db.close().await.unwrap();
    }
}
