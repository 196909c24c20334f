use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::broadcast::{
    Broadcast, BroadcastListQuery, BroadcastOutcome, BroadcastStatus, NewBroadcast,
};
use crate::domain::seller::Seller;
use crate::domain::subscriber::{NewSubscriber, Subscriber, SubscriberListQuery};
use crate::forms::broadcasts::{NewBroadcastForm, ScheduleBroadcastForm, SubscribeForm};
use crate::normalize::normalize_indian_phone;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    BroadcastReader, BroadcastWriter, SellerReader, SubscriberReader, SubscriberWriter,
};
use crate::services::auth::require_active_seller;
use crate::services::storefront::open_storefront;
use crate::services::{ServiceError, ServiceResult};
use crate::whatsapp;

/// Pause between consecutive sends; crude rate limiting, nothing more.
const SEND_DELAY: Duration = Duration::from_millis(200);

/// Query parameters accepted by the list endpoints in this module.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

fn require_broadcaster<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Seller>
where
    R: SellerReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;
    if !seller.broadcasts_enabled {
        return Err(ServiceError::Forbidden(
            "broadcasts are not enabled for this account".to_string(),
        ));
    }
    Ok(seller)
}

/// Opt a buyer in to a seller's broadcasts. Public endpoint.
pub fn subscribe<R>(repo: &R, seller_slug: &str, form: SubscribeForm) -> ServiceResult<Subscriber>
where
    R: SellerReader + SubscriberWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;

    let (raw_phone, name) = form
        .into_parts()
        .map_err(|error| ServiceError::Form(error.to_string()))?;
    let phone = normalize_indian_phone(&raw_phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    Ok(repo.upsert_subscriber(&NewSubscriber {
        seller_id: seller.id,
        phone,
        name,
    })?)
}

/// Opt a buyer out. The row is kept so history survives a re-opt-in.
pub fn unsubscribe<R>(repo: &R, seller_slug: &str, raw_phone: &str) -> ServiceResult<()>
where
    R: SellerReader + SubscriberWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;
    let phone = normalize_indian_phone(raw_phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    repo.opt_out_subscriber(seller.id, &phone)?;
    Ok(())
}

/// List the seller's subscribers.
pub fn list_subscribers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PageQuery,
) -> ServiceResult<Paginated<Subscriber>>
where
    R: SellerReader + SubscriberReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let page = query.page.unwrap_or(1);
    let list_query = SubscriberListQuery::new(seller.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, items) = repo.list_subscribers(list_query)?;
    Ok(Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Draft a broadcast. Requires the admin-granted broadcast toggle.
pub fn create_broadcast<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: NewBroadcastForm,
) -> ServiceResult<Broadcast>
where
    R: SellerReader + BroadcastWriter + ?Sized,
{
    let seller = require_broadcaster(repo, user)?;

    let new_broadcast = form
        .into_new_broadcast(seller.id)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    Ok(repo.create_broadcast(&new_broadcast)?)
}

/// Mark a drafted broadcast as scheduled for a future time.
///
/// Scheduling only records the intent: the seller still triggers the send.
/// A scheduled broadcast can be rescheduled; anything past sending cannot.
pub fn schedule_broadcast<R>(
    repo: &R,
    user: &AuthenticatedUser,
    broadcast_id: i32,
    form: ScheduleBroadcastForm,
) -> ServiceResult<Broadcast>
where
    R: SellerReader + BroadcastReader + BroadcastWriter + ?Sized,
{
    let seller = require_broadcaster(repo, user)?;

    let broadcast = repo
        .get_broadcast_by_id(broadcast_id, seller.id)?
        .ok_or(ServiceError::NotFound)?;
    if !broadcast.status.is_sendable() {
        return Err(ServiceError::Conflict(format!(
            "broadcast has already been processed (status: {})",
            broadcast.status.as_str()
        )));
    }

    if form.send_at <= chrono::Utc::now().naive_utc() {
        return Err(ServiceError::Form(
            "send time must be in the future".to_string(),
        ));
    }

    Ok(repo.schedule_broadcast(broadcast.id, seller.id, form.send_at)?)
}

/// List the seller's broadcasts, newest first.
pub fn list_broadcasts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PageQuery,
) -> ServiceResult<Paginated<Broadcast>>
where
    R: SellerReader + BroadcastReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let page = query.page.unwrap_or(1);
    let list_query = BroadcastListQuery::new(seller.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, items) = repo.list_broadcasts(list_query)?;
    Ok(Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// One generated delivery link of a send run.
#[derive(Debug, Serialize)]
pub struct BroadcastLink {
    pub phone: String,
    pub link: String,
}

/// Result of a send run: the final broadcast record plus the generated links.
#[derive(Debug, Serialize)]
pub struct BroadcastSendReport {
    pub broadcast: Broadcast,
    pub links: Vec<BroadcastLink>,
}

/// Send a drafted or scheduled broadcast to every opted-in subscriber.
///
/// A sequential loop with a fixed delay between sends, run to completion
/// inside the request. Failures are counted, never retried. Messages are
/// delivered as WhatsApp deep links; a subscriber whose stored phone can no
/// longer be normalized counts as failed.
pub fn send_broadcast<R>(
    repo: &R,
    user: &AuthenticatedUser,
    broadcast_id: i32,
) -> ServiceResult<BroadcastSendReport>
where
    R: SellerReader + SubscriberReader + BroadcastReader + BroadcastWriter + ?Sized,
{
    let seller = require_broadcaster(repo, user)?;

    let broadcast = repo
        .get_broadcast_by_id(broadcast_id, seller.id)?
        .ok_or(ServiceError::NotFound)?;
    if !broadcast.status.is_sendable() {
        return Err(ServiceError::Conflict(format!(
            "broadcast has already been processed (status: {})",
            broadcast.status.as_str()
        )));
    }

    let (_, subscribers) =
        repo.list_subscribers(SubscriberListQuery::new(seller.id).opted_in_only())?;

    repo.set_broadcast_status(broadcast.id, seller.id, BroadcastStatus::Sending)?;

    let mut links = Vec::with_capacity(subscribers.len());
    let mut sent_count = 0;
    let mut failed_count = 0;

    for (index, subscriber) in subscribers.iter().enumerate() {
        if index > 0 {
            thread::sleep(SEND_DELAY);
        }

        match normalize_indian_phone(&subscriber.phone) {
            Ok(phone) => {
                links.push(BroadcastLink {
                    link: whatsapp::deep_link(&phone, &broadcast.message),
                    phone,
                });
                sent_count += 1;
            }
            Err(error) => {
                log::warn!(
                    "skipping subscriber {} with invalid phone: {error}",
                    subscriber.id
                );
                failed_count += 1;
            }
        }
    }

    let status = if sent_count == 0 && failed_count > 0 {
        BroadcastStatus::Failed
    } else {
        BroadcastStatus::Sent
    };

    let broadcast = repo.record_broadcast_outcome(
        broadcast.id,
        seller.id,
        &BroadcastOutcome {
            status,
            sent_count,
            failed_count,
        },
    )?;

    Ok(BroadcastSendReport { broadcast, links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    use crate::SELLER_ROLE;
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{
        MockBroadcastReader, MockBroadcastWriter, MockSellerReader, MockSubscriberReader,
    };

    struct FakeRepo {
        seller_reader: MockSellerReader,
        subscriber_reader: MockSubscriberReader,
        broadcast_reader: MockBroadcastReader,
        broadcast_writer: MockBroadcastWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                seller_reader: MockSellerReader::new(),
                subscriber_reader: MockSubscriberReader::new(),
                broadcast_reader: MockBroadcastReader::new(),
                broadcast_writer: MockBroadcastWriter::new(),
            }
        }
    }

    impl SellerReader for FakeRepo {
        fn get_seller_by_id(&self, id: i32) -> RepositoryResult<Option<Seller>> {
            self.seller_reader.get_seller_by_id(id)
        }
        fn get_seller_by_email(&self, email: &str) -> RepositoryResult<Option<Seller>> {
            self.seller_reader.get_seller_by_email(email)
        }
        fn get_seller_by_slug(&self, slug: &str) -> RepositoryResult<Option<Seller>> {
            self.seller_reader.get_seller_by_slug(slug)
        }
        fn list_sellers(
            &self,
            query: crate::domain::seller::SellerListQuery,
        ) -> RepositoryResult<(usize, Vec<Seller>)> {
            self.seller_reader.list_sellers(query)
        }
    }

    impl SubscriberReader for FakeRepo {
        fn list_subscribers(
            &self,
            query: SubscriberListQuery,
        ) -> RepositoryResult<(usize, Vec<Subscriber>)> {
            self.subscriber_reader.list_subscribers(query)
        }
    }

    impl BroadcastReader for FakeRepo {
        fn get_broadcast_by_id(
            &self,
            id: i32,
            seller_id: i32,
        ) -> RepositoryResult<Option<Broadcast>> {
            self.broadcast_reader.get_broadcast_by_id(id, seller_id)
        }
        fn list_broadcasts(
            &self,
            query: BroadcastListQuery,
        ) -> RepositoryResult<(usize, Vec<Broadcast>)> {
            self.broadcast_reader.list_broadcasts(query)
        }
    }

    impl BroadcastWriter for FakeRepo {
        fn create_broadcast(&self, new_broadcast: &NewBroadcast) -> RepositoryResult<Broadcast> {
            self.broadcast_writer.create_broadcast(new_broadcast)
        }
        fn set_broadcast_status(
            &self,
            broadcast_id: i32,
            seller_id: i32,
            status: BroadcastStatus,
        ) -> RepositoryResult<Broadcast> {
            self.broadcast_writer
                .set_broadcast_status(broadcast_id, seller_id, status)
        }
        fn schedule_broadcast(
            &self,
            broadcast_id: i32,
            seller_id: i32,
            send_at: chrono::NaiveDateTime,
        ) -> RepositoryResult<Broadcast> {
            self.broadcast_writer
                .schedule_broadcast(broadcast_id, seller_id, send_at)
        }
        fn record_broadcast_outcome(
            &self,
            broadcast_id: i32,
            seller_id: i32,
            outcome: &BroadcastOutcome,
        ) -> RepositoryResult<Broadcast> {
            self.broadcast_writer
                .record_broadcast_outcome(broadcast_id, seller_id, outcome)
        }
    }

    fn broadcaster() -> Seller {
        let now = Utc::now().naive_utc();
        Seller {
            id: 4,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "hash".to_string(),
            phone: "+919876543210".to_string(),
            slug: "ashas-boutique".to_string(),
            store_name: "Asha's Boutique".to_string(),
            description: None,
            logo_url: None,
            banner_url: None,
            role: SELLER_ROLE.to_string(),
            is_approved: true,
            is_active: true,
            broadcasts_enabled: true,
            trial_ends_at: now + ChronoDuration::days(7),
            created_at: now,
            updated_at: now,
        }
    }

    fn draft() -> Broadcast {
        let now = Utc::now().naive_utc();
        Broadcast {
            id: 6,
            seller_id: 4,
            message: "Flash sale today".to_string(),
            status: BroadcastStatus::Draft,
            sent_count: 0,
            failed_count: 0,
            scheduled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn subscriber(id: i32, phone: &str) -> Subscriber {
        let now = Utc::now().naive_utc();
        Subscriber {
            id,
            seller_id: 4,
            phone: phone.to_string(),
            name: None,
            is_opted_in: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn seller_user() -> AuthenticatedUser {
        AuthenticatedUser::new(4, "asha@example.com", SELLER_ROLE)
    }

    #[test]
    fn broadcast_toggle_gates_drafting() {
        let mut repo = FakeRepo::new();
        repo.seller_reader.expect_get_seller_by_id().returning(|_| {
            let mut seller = broadcaster();
            seller.broadcasts_enabled = false;
            Ok(Some(seller))
        });

        let form = NewBroadcastForm {
            message: "hello".to_string(),
        };

        assert!(matches!(
            create_broadcast(&repo, &seller_user(), form),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn send_counts_bad_phones_as_failures() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_id()
            .returning(|_| Ok(Some(broadcaster())));
        repo.broadcast_reader
            .expect_get_broadcast_by_id()
            .returning(|_, _| Ok(Some(draft())));
        repo.subscriber_reader
            .expect_list_subscribers()
            .withf(|query| query.opted_in_only)
            .returning(|_| {
                Ok((
                    2,
                    vec![subscriber(1, "+919876500001"), subscriber(2, "12345")],
                ))
            });
        repo.broadcast_writer
            .expect_set_broadcast_status()
            .withf(|_, _, status| *status == BroadcastStatus::Sending)
            .returning(|_, _, _| Ok(draft()));
        repo.broadcast_writer
            .expect_record_broadcast_outcome()
            .withf(|_, _, outcome| {
                outcome.status == BroadcastStatus::Sent
                    && outcome.sent_count == 1
                    && outcome.failed_count == 1
            })
            .returning(|_, _, outcome| {
                let mut broadcast = draft();
                broadcast.status = outcome.status;
                broadcast.sent_count = outcome.sent_count;
                broadcast.failed_count = outcome.failed_count;
                Ok(broadcast)
            });

        let report = send_broadcast(&repo, &seller_user(), 6).expect("send should run");

        assert_eq!(report.links.len(), 1);
        assert!(report.links[0].link.contains("919876500001"));
        assert_eq!(report.broadcast.sent_count, 1);
        assert_eq!(report.broadcast.failed_count, 1);
    }

    #[test]
    fn draft_can_be_scheduled_for_a_future_time() {
        let send_at = Utc::now().naive_utc() + ChronoDuration::hours(3);

        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_id()
            .returning(|_| Ok(Some(broadcaster())));
        repo.broadcast_reader
            .expect_get_broadcast_by_id()
            .returning(|_, _| Ok(Some(draft())));
        repo.broadcast_writer
            .expect_schedule_broadcast()
            .withf(move |id, seller_id, at| *id == 6 && *seller_id == 4 && *at == send_at)
            .returning(|_, _, at| {
                let mut broadcast = draft();
                broadcast.status = BroadcastStatus::Scheduled;
                broadcast.scheduled_at = Some(at);
                Ok(broadcast)
            });

        let scheduled = schedule_broadcast(
            &repo,
            &seller_user(),
            6,
            ScheduleBroadcastForm { send_at },
        )
        .expect("scheduling should run");

        assert_eq!(scheduled.status, BroadcastStatus::Scheduled);
        assert_eq!(scheduled.scheduled_at, Some(send_at));
    }

    #[test]
    fn scheduling_rejects_past_send_times() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_id()
            .returning(|_| Ok(Some(broadcaster())));
        repo.broadcast_reader
            .expect_get_broadcast_by_id()
            .returning(|_, _| Ok(Some(draft())));

        let form = ScheduleBroadcastForm {
            send_at: Utc::now().naive_utc() - ChronoDuration::hours(1),
        };

        assert!(matches!(
            schedule_broadcast(&repo, &seller_user(), 6, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn scheduled_broadcast_can_be_sent() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_id()
            .returning(|_| Ok(Some(broadcaster())));
        repo.broadcast_reader
            .expect_get_broadcast_by_id()
            .returning(|_, _| {
                let mut broadcast = draft();
                broadcast.status = BroadcastStatus::Scheduled;
                broadcast.scheduled_at = Some(Utc::now().naive_utc());
                Ok(Some(broadcast))
            });
        repo.subscriber_reader
            .expect_list_subscribers()
            .returning(|_| Ok((1, vec![subscriber(1, "+919876500001")])));
        repo.broadcast_writer
            .expect_set_broadcast_status()
            .returning(|_, _, _| Ok(draft()));
        repo.broadcast_writer
            .expect_record_broadcast_outcome()
            .returning(|_, _, outcome| {
                let mut broadcast = draft();
                broadcast.status = outcome.status;
                broadcast.sent_count = outcome.sent_count;
                Ok(broadcast)
            });

        let report = send_broadcast(&repo, &seller_user(), 6).expect("send should run");
        assert_eq!(report.broadcast.status, BroadcastStatus::Sent);
        assert_eq!(report.links.len(), 1);
    }

    #[test]
    fn already_sent_broadcast_cannot_be_resent() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_id()
            .returning(|_| Ok(Some(broadcaster())));
        repo.broadcast_reader
            .expect_get_broadcast_by_id()
            .returning(|_, _| {
                let mut broadcast = draft();
                broadcast.status = BroadcastStatus::Sent;
                Ok(Some(broadcast))
            });

        assert!(matches!(
            send_broadcast(&repo, &seller_user(), 6),
            Err(ServiceError::Conflict(_))
        ));
    }
}
