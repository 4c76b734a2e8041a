//! Database operations for campaigns and campaign images, and the SQLite backed campaign store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    campaign::{
        Campaign, CampaignImage, CampaignName, CampaignStore, NewCampaign, NewCampaignImage,
    },
    database_id::CampaignId,
    db::lock_connection,
};

/// Stores campaigns and their images in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCampaignStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCampaignStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The tables must already exist, see [create_campaign_tables].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CampaignStore for SQLiteCampaignStore {
    fn get(&self, id: CampaignId) -> Result<Option<Campaign>, Error> {
        let connection = lock_connection(&self.connection)?;
        get_campaign(id, &connection)
    }

    fn get_all(&self) -> Result<Vec<Campaign>, Error> {
        let connection = lock_connection(&self.connection)?;
        get_all_campaigns(&connection)
    }

    fn get_by_owner(&self, user_id: UserID) -> Result<Vec<Campaign>, Error> {
        let connection = lock_connection(&self.connection)?;
        get_campaigns_by_owner(user_id, &connection)
    }

    fn create(&self, campaign: NewCampaign) -> Result<Campaign, Error> {
        let connection = lock_connection(&self.connection)?;
        create_campaign(campaign, &connection)
    }

    fn update(&self, campaign: &Campaign) -> Result<Campaign, Error> {
        let connection = lock_connection(&self.connection)?;
        update_campaign(campaign, &connection)
    }

    fn mark_all_images_non_primary(&self, campaign_id: CampaignId) -> Result<usize, Error> {
        let connection = lock_connection(&self.connection)?;
        mark_all_images_non_primary(campaign_id, &connection)
    }

    fn create_image(&self, image: NewCampaignImage) -> Result<CampaignImage, Error> {
        let connection = lock_connection(&self.connection)?;
        create_campaign_image(image, &connection)
    }

    /// Save a new image, demoting the other images of the campaign first if `image` is primary.
    ///
    /// Both steps run in one SQL transaction while the connection lock is held, so concurrent
    /// uploads cannot leave a campaign with two primary images.
    fn save_image(&self, image: NewCampaignImage) -> Result<CampaignImage, Error> {
        let connection = lock_connection(&self.connection)?;
        let transaction = connection.unchecked_transaction()?;

        if image.is_primary {
            let demoted = mark_all_images_non_primary(image.campaign_id, &transaction)?;
            tracing::debug!(
                "demoted {demoted} image(s) of campaign {} before saving a new primary image",
                image.campaign_id
            );
        }

        let image = create_campaign_image(image, &transaction)?;
        transaction.commit()?;

        Ok(image)
    }
}

/// Create the campaign and campaign image tables.
///
/// A partial unique index ensures that a campaign has at most one primary image.
pub fn create_campaign_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS campaign (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            short_description TEXT NOT NULL,
            description TEXT NOT NULL,
            goal_amount INTEGER NOT NULL,
            current_amount INTEGER NOT NULL DEFAULT 0,
            backer_count INTEGER NOT NULL DEFAULT 0,
            perks TEXT NOT NULL,
            slug TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_campaign_user_id ON campaign(user_id);

        CREATE TABLE IF NOT EXISTS campaign_image (
            id INTEGER PRIMARY KEY,
            campaign_id INTEGER NOT NULL,
            file_name TEXT NOT NULL,
            is_primary INTEGER NOT NULL DEFAULT 0 CHECK (is_primary IN (0, 1)),
            created_at TEXT NOT NULL,
            FOREIGN KEY(campaign_id) REFERENCES campaign(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_campaign_image_campaign_id ON campaign_image(campaign_id);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_campaign_image_one_primary
            ON campaign_image(campaign_id) WHERE is_primary = 1;",
    )?;

    Ok(())
}

/// Retrieve a campaign and its images, or `None` if there is no campaign with `id`.
pub fn get_campaign(id: CampaignId, connection: &Connection) -> Result<Option<Campaign>, Error> {
    let campaign = connection
        .prepare(
            "SELECT id, user_id, name, short_description, description, goal_amount,
                current_amount, backer_count, perks, slug, created_at, updated_at
            FROM campaign WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_campaign_row)
        .optional()?;

    match campaign {
        Some(mut campaign) => {
            campaign.images = get_campaign_images(campaign.id, connection)?;
            Ok(Some(campaign))
        }
        None => Ok(None),
    }
}

/// Retrieve all campaigns and their images, ordered by ID.
pub fn get_all_campaigns(connection: &Connection) -> Result<Vec<Campaign>, Error> {
    let campaigns = connection
        .prepare(
            "SELECT id, user_id, name, short_description, description, goal_amount,
                current_amount, backer_count, perks, slug, created_at, updated_at
            FROM campaign ORDER BY id",
        )?
        .query_map([], map_campaign_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let images = connection
        .prepare(
            "SELECT id, campaign_id, file_name, is_primary, created_at
            FROM campaign_image ORDER BY id",
        )?
        .query_map([], map_image_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(attach_images(campaigns, images))
}

/// Retrieve the campaigns owned by `user_id` and their images, ordered by ID.
pub fn get_campaigns_by_owner(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = connection
        .prepare(
            "SELECT id, user_id, name, short_description, description, goal_amount,
                current_amount, backer_count, perks, slug, created_at, updated_at
            FROM campaign WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_campaign_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let images = connection
        .prepare(
            "SELECT i.id, i.campaign_id, i.file_name, i.is_primary, i.created_at
            FROM campaign_image i
            INNER JOIN campaign c ON c.id = i.campaign_id
            WHERE c.user_id = :user_id
            ORDER BY i.id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_image_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(attach_images(campaigns, images))
}

/// Insert a new campaign and return it with its generated ID.
pub fn create_campaign(campaign: NewCampaign, connection: &Connection) -> Result<Campaign, Error> {
    let now = OffsetDateTime::now_utc();
    let NewCampaign {
        user_id,
        fields,
        slug,
    } = campaign;

    let campaign = connection
        .prepare(
            "INSERT INTO campaign
                (user_id, name, short_description, description, goal_amount, perks, slug,
                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id, user_id, name, short_description, description, goal_amount,
                current_amount, backer_count, perks, slug, created_at, updated_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                fields.name.as_ref(),
                fields.short_description,
                fields.description,
                fields.goal_amount,
                fields.perks,
                slug,
                now,
                now,
            ),
            map_campaign_row,
        )?;

    Ok(campaign)
}

/// Overwrite the mutable fields and slug of the stored campaign with those of `campaign`.
///
/// The stored owner is left untouched even if `campaign.user_id` differs.
///
/// # Errors
///
/// Returns an [Error::NotFound] if there is no campaign with `campaign.id`.
pub fn update_campaign(campaign: &Campaign, connection: &Connection) -> Result<Campaign, Error> {
    let mut updated = connection
        .prepare(
            "UPDATE campaign
            SET name = ?1, short_description = ?2, description = ?3, goal_amount = ?4,
                perks = ?5, slug = ?6, updated_at = ?7
            WHERE id = ?8
            RETURNING id, user_id, name, short_description, description, goal_amount,
                current_amount, backer_count, perks, slug, created_at, updated_at",
        )?
        .query_row(
            (
                campaign.name.as_ref(),
                &campaign.short_description,
                &campaign.description,
                campaign.goal_amount,
                &campaign.perks,
                &campaign.slug,
                OffsetDateTime::now_utc(),
                campaign.id,
            ),
            map_campaign_row,
        )?;

    updated.images = get_campaign_images(updated.id, connection)?;

    Ok(updated)
}

/// Clear the primary flag of every image of `campaign_id` and return how many were primary.
pub fn mark_all_images_non_primary(
    campaign_id: CampaignId,
    connection: &Connection,
) -> Result<usize, Error> {
    let rows_affected = connection.execute(
        "UPDATE campaign_image SET is_primary = 0 WHERE campaign_id = ?1 AND is_primary = 1",
        [campaign_id],
    )?;

    Ok(rows_affected)
}

/// Insert a campaign image as is and return it with its generated ID.
pub fn create_campaign_image(
    image: NewCampaignImage,
    connection: &Connection,
) -> Result<CampaignImage, Error> {
    let image = connection
        .prepare(
            "INSERT INTO campaign_image (campaign_id, file_name, is_primary, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, campaign_id, file_name, is_primary, created_at",
        )?
        .query_row(
            (
                image.campaign_id,
                image.file_name,
                image.is_primary,
                OffsetDateTime::now_utc(),
            ),
            map_image_row,
        )?;

    Ok(image)
}

/// Retrieve the images of a campaign ordered by ID.
pub fn get_campaign_images(
    campaign_id: CampaignId,
    connection: &Connection,
) -> Result<Vec<CampaignImage>, Error> {
    connection
        .prepare(
            "SELECT id, campaign_id, file_name, is_primary, created_at
            FROM campaign_image WHERE campaign_id = :campaign_id ORDER BY id",
        )?
        .query_map(&[(":campaign_id", &campaign_id)], map_image_row)?
        .map(|maybe_image| maybe_image.map_err(|error| error.into()))
        .collect()
}

fn attach_images(campaigns: Vec<Campaign>, images: Vec<CampaignImage>) -> Vec<Campaign> {
    let mut images_by_campaign: HashMap<CampaignId, Vec<CampaignImage>> = HashMap::new();

    for image in images {
        images_by_campaign
            .entry(image.campaign_id)
            .or_default()
            .push(image);
    }

    campaigns
        .into_iter()
        .map(|mut campaign| {
            campaign.images = images_by_campaign.remove(&campaign.id).unwrap_or_default();
            campaign
        })
        .collect()
}

fn map_campaign_row(row: &Row) -> Result<Campaign, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Campaign {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: CampaignName::new_unchecked(&raw_name),
        short_description: row.get(3)?,
        description: row.get(4)?,
        goal_amount: row.get(5)?,
        current_amount: row.get(6)?,
        backer_count: row.get(7)?,
        perks: row.get(8)?,
        slug: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        images: Vec::new(),
    })
}

fn map_image_row(row: &Row) -> Result<CampaignImage, rusqlite::Error> {
    Ok(CampaignImage {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        file_name: row.get(2)?,
        is_primary: row.get(3)?,
        created_at: row.get(4)?,
    })
}
