//! Duty selection
//!
//! No-immediate-repeat rotation: the new duty set is drawn only from roster
//! members who were not on duty last time. It is never padded back up from
//! the previous set, so it can come out smaller than `duty_count`, even empty.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Result of one selection round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Roster and previous duty set are the same set; nothing to persist
    Unchanged(Vec<String>),
    /// A fresh duty set that must be written back as `lastDuty`
    Rotated(Vec<String>),
}

impl Selection {
    pub fn users(&self) -> &[String] {
        match self {
            Selection::Unchanged(users) | Selection::Rotated(users) => users,
        }
    }

    pub fn into_users(self) -> Vec<String> {
        match self {
            Selection::Unchanged(users) | Selection::Rotated(users) => users,
        }
    }
}

/// Order-independent comparison; sizes must match too
pub fn same_members(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

/// Pick today's duty set from the current roster and the previous duty set
pub fn select_duty<R: Rng + ?Sized>(
    roster: &[String],
    last_duty: &[String],
    duty_count: u32,
    rng: &mut R,
) -> Selection {
    debug!(
        roster_len = roster.len(),
        last_len = last_duty.len(),
        duty_count,
        "select_duty: called"
    );

    if same_members(roster, last_duty) {
        debug!("select_duty: roster equals last duty, keeping it");
        return Selection::Unchanged(last_duty.to_vec());
    }

    let previous: HashSet<&str> = last_duty.iter().map(String::as_str).collect();
    let mut candidates: Vec<String> = roster
        .iter()
        .filter(|user| !previous.contains(user.as_str()))
        .cloned()
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(duty_count as usize);

    debug!(selected = candidates.len(), "select_duty: rotated");
    Selection::Rotated(candidates)
}
