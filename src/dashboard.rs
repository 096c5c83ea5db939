//! Dashboard aggregation: the little arithmetic the overview page does on
//! top of `/admin/stats` and `/admin/emails`.

use serde::Serialize;

use crate::api::types::{DashboardStats, TempEmail};

/// How many addresses the overview lists as "recent".
pub const RECENT_EMAILS: usize = 6;
/// Domain names longer than this are shortened for chart labels.
const LABEL_MAX_CHARS: usize = 12;
const LABEL_KEEP_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCount {
    pub domain: String,
    pub label: String,
    pub emails: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    /// Whole percent of addresses still active.
    pub email_active_rate: u8,
    /// Whole percent of domains still active.
    pub domain_active_rate: u8,
    pub inactive_domains: u64,
    pub expired_emails: u64,
    /// Address count per domain, in first-seen order.
    pub emails_by_domain: Vec<DomainCount>,
    /// Largest per-domain count, never below 1 so it can scale a bar.
    pub max_domain_count: usize,
    pub recent: Vec<TempEmail>,
}

impl DashboardSummary {
    #[must_use]
    pub fn build(stats: &DashboardStats, emails: &[TempEmail]) -> Self {
        let emails_by_domain = group_by_domain(emails);
        let max_domain_count = emails_by_domain.iter().map(|c| c.emails).max().unwrap_or(0).max(1);
        Self {
            stats: *stats,
            email_active_rate: percent(stats.active_emails, stats.total_emails),
            domain_active_rate: percent(stats.active_domains, stats.total_domains),
            inactive_domains: stats.total_domains.saturating_sub(stats.active_domains),
            expired_emails: stats.total_emails.saturating_sub(stats.active_emails),
            emails_by_domain,
            max_domain_count,
            recent: emails.iter().take(RECENT_EMAILS).cloned().collect(),
        }
    }
}

/// `round(part / total * 100)`, 0 when `total` is 0, capped at 100.
#[must_use]
pub fn percent(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (u128::from(part) * 200 + u128::from(total)) / (u128::from(total) * 2);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

/// Short label for a domain in chart axes.
#[must_use]
pub fn chart_label(domain: &str) -> String {
    if domain.chars().count() > LABEL_MAX_CHARS {
        let kept: String = domain.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{kept}...")
    } else {
        domain.to_owned()
    }
}

fn group_by_domain(emails: &[TempEmail]) -> Vec<DomainCount> {
    let mut counts: Vec<DomainCount> = Vec::new();
    for email in emails {
        match counts.iter_mut().find(|c| c.domain == email.domain) {
            Some(entry) => entry.emails += 1,
            None => counts.push(DomainCount {
                domain: email.domain.clone(),
                label: chart_label(&email.domain),
                emails: 1,
            }),
        }
    }
    counts
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
