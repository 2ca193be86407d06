//! Demo data bootstrap.
//!
//! Every row is looked up by a natural key before it is inserted, so running
//! the seed against an already seeded database changes nothing. Messages are
//! keyed by `(ticket, content)`; numeric ids would only hold on a pristine store.

use crate::store;
use entity::{message, ticket, user};
use sea_orm::{ConnectionTrait, DbErr};
use slog::{Logger, debug, info};

struct DemoUser {
    name: &'static str,
    email: &'static str,
}

struct DemoTicket {
    title: &'static str,
    description: &'static str,
    owner: &'static str,
    message: &'static str,
}

const USERS: &[DemoUser] = &[
    DemoUser { name: "Eli", email: "eli@example.com" },
    DemoUser { name: "Alice", email: "alice@example.com" },
    DemoUser { name: "Bob", email: "bob@example.com" },
];

const TICKETS: &[DemoTicket] = &[
    DemoTicket {
        title: "Login Issue",
        description: "Cannot log into the account",
        owner: "eli@example.com",
        message: "I tried resetting my password but it didn't work",
    },
    DemoTicket {
        title: "Payment Failure",
        description: "Payment is not going through",
        owner: "alice@example.com",
        message: "Payment failed with credit card, please help!",
    },
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub existing: usize,
}

impl Tally {
    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: Tally,
    pub tickets: Tally,
    pub messages: Tally,
}

pub async fn run<C: ConnectionTrait>(db: &C, logger: &Logger) -> Result<SeedReport, DbErr> {
    info!(logger, "Seeding database...");
    let mut report = SeedReport::default();

    let mut users = Vec::with_capacity(USERS.len());
    for demo in USERS {
        let (user, created) = ensure_user(db, demo).await?;
        debug!(logger, "user ready"; "email" => &user.email, "created" => created);
        report.users.record(created);
        users.push(user);
    }

    for demo in TICKETS {
        let owner = users.iter().find(|u| u.email == demo.owner).map(|u| u.id);

        let (ticket, created) = ensure_ticket(db, demo, owner).await?;
        debug!(logger, "ticket ready"; "title" => &ticket.title, "created" => created);
        report.tickets.record(created);

        let (_, created) = ensure_message(db, &ticket, demo.message, owner).await?;
        report.messages.record(created);
    }

    info!(
        logger,
        "Database seeded successfully!";
        "users_created" => report.users.created,
        "tickets_created" => report.tickets.created,
        "messages_created" => report.messages.created
    );

    Ok(report)
}

async fn ensure_user<C: ConnectionTrait>(
    db: &C,
    demo: &DemoUser,
) -> Result<(user::Model, bool), DbErr> {
    if let Some(existing) = store::find_user_by_email(db, demo.email).await? {
        return Ok((existing, false));
    }
    let user = store::create_user(db, demo.name.to_string(), demo.email.to_string()).await?;
    Ok((user, true))
}

async fn ensure_ticket<C: ConnectionTrait>(
    db: &C,
    demo: &DemoTicket,
    owner: Option<i32>,
) -> Result<(ticket::Model, bool), DbErr> {
    if let Some(existing) = store::find_ticket_by_title(db, demo.title).await? {
        return Ok((existing, false));
    }
    let ticket = store::create_ticket(
        db,
        demo.title.to_string(),
        demo.description.to_string(),
        owner,
    )
    .await?;
    Ok((ticket, true))
}

async fn ensure_message<C: ConnectionTrait>(
    db: &C,
    ticket: &ticket::Model,
    content: &str,
    author: Option<i32>,
) -> Result<(message::Model, bool), DbErr> {
    if let Some(existing) = store::find_message(db, ticket.id, content).await? {
        return Ok((existing, false));
    }
    let message = store::create_message(db, ticket.id, content.to_string(), author).await?;
    Ok((message, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;
    use entity::{message, ticket, user};
    use sea_orm::{EntityTrait, PaginatorTrait};
    use slog::{Discard, o};

    fn quiet_logger() -> Logger {
        Logger::root(Discard, o!())
    }

    #[tokio::test]
    async fn test_seed_fresh_database() {
        let db = memory_db().await;

        let report = run(&db, &quiet_logger()).await.unwrap();

        assert_eq!(report.users, Tally { created: 3, existing: 0 });
        assert_eq!(report.tickets, Tally { created: 2, existing: 0 });
        assert_eq!(report.messages, Tally { created: 2, existing: 0 });

        let login = store::find_ticket_by_title(&db, "Login Issue")
            .await
            .unwrap()
            .unwrap();
        let eli = store::find_user_by_email(&db, "eli@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(login.user_id, Some(eli.id));
        assert_eq!(login.status, "open");

        let messages = store::list_messages(&db, login.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user.as_ref().map(|u| u.id), Some(eli.id));
    }

    #[tokio::test]
    async fn test_seed_twice_is_idempotent() {
        let db = memory_db().await;
        let logger = quiet_logger();

        run(&db, &logger).await.unwrap();
        let second = run(&db, &logger).await.unwrap();

        assert_eq!(second.users, Tally { created: 0, existing: 3 });
        assert_eq!(second.tickets, Tally { created: 0, existing: 2 });
        assert_eq!(second.messages, Tally { created: 0, existing: 2 });

        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(message::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_keeps_unrelated_messages_apart() {
        let db = memory_db().await;
        let logger = quiet_logger();

        // A message created before seeding takes id 1 once its ticket exists.
        let ticket = store::create_ticket(&db, "Printer".into(), "Jammed".into(), None)
            .await
            .unwrap();
        store::create_message(&db, ticket.id, "Paper stuck".into(), None)
            .await
            .unwrap();

        let report = run(&db, &logger).await.unwrap();

        assert_eq!(report.messages.created, 2);
        assert_eq!(message::Entity::find().count(&db).await.unwrap(), 3);
    }
}
