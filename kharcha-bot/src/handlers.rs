//! Command handlers: every inbound event is dispatched here, and every
//! failure is caught here. Nothing below this layer reports to the user.

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use kharcha_core::{
    filter_expenses, parse_free_text, summarize, ExpenseRecord, Period, Window, USAGE_HINT,
};
use kharcha_store::ExpenseStore;

use crate::event::{Event, Reply, SlashCommand};

/// Source of "now", injected so tests can pin the clock.
pub trait Clock {
    /// Local wall-clock time in the given timezone.
    fn now(&self, tz: Tz) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, tz: Tz) -> NaiveDateTime {
        Utc::now().with_timezone(&tz).naive_local()
    }
}

/// Always returns the same instant. For tests.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self, _tz: Tz) -> NaiveDateTime {
        self.0
    }
}

/// The event-handling boundary. Holds the injected store and clock plus the
/// configured timezone and currency symbol.
pub struct Handlers<S, C = SystemClock> {
    store: S,
    tz: Tz,
    currency: String,
    clock: C,
}

impl<S: ExpenseStore> Handlers<S> {
    pub fn new(store: S, tz: Tz, currency: impl Into<String>) -> Self {
        Self::with_clock(store, tz, currency, SystemClock)
    }
}

impl<S: ExpenseStore, C: Clock> Handlers<S, C> {
    pub fn with_clock(store: S, tz: Tz, currency: impl Into<String>, clock: C) -> Self {
        Self {
            store,
            tz,
            currency: currency.into(),
            clock,
        }
    }

    /// Route one inbound event to its handler. Handle one event at a time;
    /// there is no conversation state between calls.
    pub fn dispatch(&self, event: Event) -> Reply {
        match event {
            Event::Slash(SlashCommand::Log {
                amount,
                item,
                category,
            }) => self.log_structured(amount, &item, &category),
            Event::Slash(SlashCommand::SummaryToday) => self.summary(Period::Today),
            Event::Slash(SlashCommand::SummaryWeek) => self.summary(Period::ThisWeek),
            Event::Slash(SlashCommand::SummaryMonth) => self.summary(Period::ThisMonth),
            Event::Slash(SlashCommand::Unknown(name)) => {
                tracing::warn!(command = %name, "unrecognized slash command");
                Reply::ephemeral(format!(
                    "Unknown command: /{name}. Try /ex, /summary, /summary_week or /summary_month."
                ))
            }
            Event::Direct { text } => self.log_free_text(&text),
        }
    }

    /// Structured mode: discrete amount/item/category fields.
    fn log_structured(&self, amount: f64, item: &str, category: &str) -> Reply {
        if !amount.is_finite() || amount < 0.0 {
            return Reply::ephemeral(format!("'{amount}' is not a valid amount"));
        }

        let record = ExpenseRecord::new(
            self.clock.now(self.tz),
            amount,
            item,
            Some(category.to_string()),
        );
        match self.store.append_row(&record.to_row()) {
            Ok(()) => Reply::ephemeral(format!(
                "Logged: {}{amount} on *{item}* under *{category}*",
                self.currency
            )),
            Err(e) => {
                tracing::warn!(error = %e, "append failed");
                Reply::ephemeral(format!("Failed to log expense: {e:#}"))
            }
        }
    }

    /// Free-text mode: one line of "<amount> <description>", no category.
    fn log_free_text(&self, text: &str) -> Reply {
        let parsed = match parse_free_text(text) {
            Ok(parsed) => parsed,
            Err(e) => return Reply::ephemeral(format!("{e}. {USAGE_HINT}")),
        };

        let record = ExpenseRecord::new(
            self.clock.now(self.tz),
            parsed.amount,
            parsed.description.clone(),
            None,
        );
        match self.store.append_row(&record.to_row()) {
            Ok(()) => Reply::ephemeral(format!(
                "Logged: {}{} on *{}*",
                self.currency, parsed.amount, parsed.description
            )),
            Err(e) => {
                tracing::warn!(error = %e, "append failed");
                Reply::ephemeral(format!("Failed to log expense: {e:#}"))
            }
        }
    }

    fn summary(&self, period: Period) -> Reply {
        match self.try_summary(period) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "summary failed");
                Reply::ephemeral(format!("Failed to generate summary: {e:#}"))
            }
        }
    }

    fn try_summary(&self, period: Period) -> Result<Reply> {
        let anchor = self.clock.now(self.tz).date();
        let window = Window::anchored(period, anchor);

        let rows = self.store.read_all_rows()?;
        let records = match period {
            Period::Today => filter_expenses(&rows, window.start, None),
            _ => filter_expenses(&rows, window.start, Some(window.end)),
        };
        let summary = summarize(&records);

        Ok(Reply::Card {
            title: window.title(period),
            body: summary.render(&self.currency),
            footer: format!("Total Expenses: {}{:.2}", self.currency, summary.total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use chrono_tz::Asia::Kolkata;
    use kharcha_core::RawRow;
    use kharcha_store::MemoryStore;

    fn fixed(y: i32, m: u32, d: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
        )
    }

    fn handlers(store: MemoryStore) -> Handlers<MemoryStore, FixedClock> {
        Handlers::with_clock(store, Kolkata, "₹", fixed(2024, 3, 1))
    }

    fn body(reply: &Reply) -> &str {
        match reply {
            Reply::Text { body, .. } => body,
            Reply::Card { body, .. } => body,
        }
    }

    #[test]
    fn test_structured_log_appends_and_confirms() {
        let h = handlers(MemoryStore::new());
        let reply = h.dispatch(Event::Slash(SlashCommand::Log {
            amount: 150.0,
            item: "coffee".to_string(),
            category: "food".to_string(),
        }));

        assert_eq!(
            reply,
            Reply::ephemeral("Logged: ₹150 on *coffee* under *food*")
        );
        let rows = h.store.read_all_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Date"], "2024-03-01 18:30:00");
        assert_eq!(rows[0]["Category"], "food");
    }

    #[test]
    fn test_structured_log_rejects_negative_amount() {
        let h = handlers(MemoryStore::new());
        let reply = h.dispatch(Event::Slash(SlashCommand::Log {
            amount: -5.0,
            item: "refund".to_string(),
            category: "misc".to_string(),
        }));

        assert!(body(&reply).contains("not a valid amount"));
        assert_eq!(h.store.data_row_count(), 0);
    }

    #[test]
    fn test_free_text_log_appends_without_category() {
        let h = handlers(MemoryStore::new());
        let reply = h.dispatch(Event::Direct {
            text: "12.50 lunch".to_string(),
        });

        assert_eq!(reply, Reply::ephemeral("Logged: ₹12.5 on *lunch*"));
        let rows = h.store.read_all_rows().unwrap();
        assert_eq!(rows[0]["Amount"], "12.5");
        assert_eq!(rows[0]["Item"], "lunch");
        assert_eq!(rows[0]["Category"], "");
    }

    #[test]
    fn test_free_text_rejection_appends_nothing() {
        let h = handlers(MemoryStore::new());
        let reply = h.dispatch(Event::Direct {
            text: "lunch 12.50".to_string(),
        });

        assert!(body(&reply).contains("not a valid amount"));
        assert!(body(&reply).contains("Usage:"));
        assert_eq!(h.store.data_row_count(), 0);
    }

    #[test]
    fn test_summary_today_card() {
        let h = handlers(MemoryStore::new());
        for (amount, item, category) in [
            (100.0, "groceries", "food"),
            (50.0, "dinner", "food"),
            (25.0, "bus", "transport"),
        ] {
            h.dispatch(Event::Slash(SlashCommand::Log {
                amount,
                item: item.to_string(),
                category: category.to_string(),
            }));
        }

        let reply = h.dispatch(Event::Slash(SlashCommand::SummaryToday));
        match reply {
            Reply::Card {
                title,
                body,
                footer,
            } => {
                assert_eq!(title, "Today's Expense Summary (Mar 01, 2024)");
                assert!(body.contains("- food: ₹150.00 (85.7%)"));
                assert!(body.contains("- transport: ₹25.00 (14.3%)"));
                assert_eq!(footer, "Total Expenses: ₹175.00");
            }
            other => panic!("expected a card, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_week_excludes_out_of_window_rows() {
        // Anchor 2024-03-07 (Thursday): window Mar 04 - Mar 10.
        let h = Handlers::with_clock(MemoryStore::new(), Kolkata, "₹", fixed(2024, 3, 7));
        for (date, amount) in [("2024-03-03", "10"), ("2024-03-04", "20"), ("2024-03-10", "30")] {
            h.store
                .append_row(&[
                    date.to_string(),
                    amount.to_string(),
                    "x".to_string(),
                    "misc".to_string(),
                ])
                .unwrap();
        }

        let reply = h.dispatch(Event::Slash(SlashCommand::SummaryWeek));
        match reply {
            Reply::Card { footer, .. } => assert_eq!(footer, "Total Expenses: ₹50.00"),
            other => panic!("expected a card, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_month_empty_is_sentinel() {
        let h = handlers(MemoryStore::new());
        let reply = h.dispatch(Event::Slash(SlashCommand::SummaryMonth));
        match reply {
            Reply::Card { body, footer, .. } => {
                assert_eq!(body, "No expenses found");
                assert_eq!(footer, "Total Expenses: ₹0.00");
            }
            other => panic!("expected a card, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_command_falls_back() {
        let h = handlers(MemoryStore::new());
        let reply = h.dispatch(Event::Slash(SlashCommand::Unknown("budget".to_string())));
        assert!(body(&reply).contains("Unknown command: /budget"));
    }

    struct FailingStore;

    impl ExpenseStore for FailingStore {
        fn append_row(&self, _row: &[String]) -> Result<()> {
            Err(anyhow!("sheet append failed: 503"))
        }

        fn read_all_rows(&self) -> Result<Vec<RawRow>> {
            Err(anyhow!("sheet read failed: 503"))
        }

        fn ensure_header(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_store_failure_surfaces_cause_text() {
        let h = Handlers::with_clock(FailingStore, Kolkata, "₹", fixed(2024, 3, 1));

        let reply = h.dispatch(Event::Direct {
            text: "12.50 lunch".to_string(),
        });
        assert!(body(&reply).contains("Failed to log expense"));
        assert!(body(&reply).contains("503"));

        let reply = h.dispatch(Event::Slash(SlashCommand::SummaryToday));
        assert!(body(&reply).contains("Failed to generate summary"));
        assert!(body(&reply).contains("503"));
    }
}
