// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailTaskResult;
use crate::modules::imap::client::Session;
use crate::{encode_mailbox_name, raise_error};
use async_imap::types::{Fetch, Mailbox};
use futures::TryStreamExt;
use tracing::debug;

/// The full message without setting `\Seen`.
const FULL_MESSAGE_QUERY: &str = "(UID INTERNALDATE BODY.PEEK[])";

pub const SEEN: &str = "\\Seen";
pub const DELETED: &str = "\\Deleted";

/// Commands run on one logged-in session.
pub struct ImapExecutor<'a> {
    session: &'a mut Session,
}

impl<'a> ImapExecutor<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub async fn select_mailbox(&mut self, mailbox_name: &str) -> MailTaskResult<Mailbox> {
        self.session
            .select(encode_mailbox_name!(mailbox_name))
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))
    }

    /// UIDs in the selected mailbox, ascending.
    pub async fn uid_search(&mut self, only_unread: bool) -> MailTaskResult<Vec<u32>> {
        let query = if only_unread { "UNSEEN" } else { "ALL" };
        let result = self
            .session
            .uid_search(query)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let mut uids: Vec<u32> = result.into_iter().collect();
        uids.sort_unstable();
        debug!("UID SEARCH {} matched {} message(s)", query, uids.len());
        Ok(uids)
    }

    pub async fn uid_fetch_full_messages(&mut self, uid_set: &str) -> MailTaskResult<Vec<Fetch>> {
        let list = self
            .session
            .uid_fetch(uid_set, FULL_MESSAGE_QUERY)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let result = list
            .try_collect::<Vec<Fetch>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(result)
    }

    pub async fn uid_add_flag(&mut self, uid_set: &str, flag: &str) -> MailTaskResult<()> {
        let list = self
            .session
            .uid_store(uid_set, format!("+FLAGS.SILENT ({})", flag))
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        list.try_collect::<Vec<Fetch>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    pub async fn expunge(&mut self) -> MailTaskResult<()> {
        let list = self
            .session
            .expunge()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        list.try_collect::<Vec<u32>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }
}

/// Compresses UIDs into an IMAP sequence set such as `1:3,7,9:10`.
pub fn compress_uid_list(nums: &[u32]) -> String {
    let mut sorted_nums = nums.to_vec();
    sorted_nums.sort_unstable();
    sorted_nums.dedup();

    let Some((&first, rest)) = sorted_nums.split_first() else {
        return String::new();
    };

    let mut result = Vec::new();
    let (mut start, mut end) = (first, first);
    for &n in rest {
        if n == end + 1 {
            end = n;
        } else {
            result.push(range_to_string(start, end));
            start = n;
            end = n;
        }
    }
    result.push(range_to_string(start, end));
    result.join(",")
}

fn range_to_string(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}:{}", start, end)
    }
}
