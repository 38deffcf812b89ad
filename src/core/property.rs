//! Property business logic - The single source of truth for listings.
//!
//! This module reads and mutates listings across the `properties`,
//! `property_features` and `property_images` tables, enforces the
//! owner-or-admin rule on every mutation, and normalizes every read into a
//! [`PropertyView`]. Reads are public. Authorization and not-found checks run
//! before any write.
//!
//! `create` writes all three tables in one database transaction. `update`
//! treats the features upsert and the image-set replacement as best-effort:
//! their failures are logged and reported as warnings in [`UpdateOutcome`],
//! never as an error.

use crate::{
    auth::AuthClient,
    config::settings::FeaturedPolicy,
    entities::{
        Property, PropertyFeature, PropertyImage, property, property_feature, property_image,
    },
    errors::{Error, Result},
    models::{
        Caller, ListScope, NewProperty, PropertyFeatures, PropertyPatch, PropertyView,
        UpdateOutcome,
    },
    storage::ImageStore,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use sea_orm::{
    DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, format!("O campo {field} é obrigatório")));
    }
    Ok(trimmed.to_string())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::validation(
            field,
            format!("O campo {field} deve ser um número não negativo"),
        ));
    }
    Ok(())
}

fn validate_count(field: &'static str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(Error::validation(
            field,
            format!("O campo {field} não pode ser negativo"),
        ));
    }
    Ok(())
}

fn validate_new(input: &NewProperty) -> Result<()> {
    validate_text("title", &input.title)?;
    validate_text("location", &input.location)?;
    validate_non_negative("price", input.price)?;
    validate_non_negative("area", input.area)?;
    validate_count("bedrooms", input.bedrooms)?;
    validate_count("bathrooms", input.bathrooms)?;
    Ok(())
}

fn validate_patch(patch: &PropertyPatch) -> Result<()> {
    if let Some(title) = &patch.title {
        validate_text("title", title)?;
    }
    if let Some(location) = &patch.location {
        validate_text("location", location)?;
    }
    if let Some(price) = patch.price {
        validate_non_negative("price", price)?;
    }
    if let Some(area) = patch.area {
        validate_non_negative("area", area)?;
    }
    if let Some(bedrooms) = patch.bedrooms {
        validate_count("bedrooms", bedrooms)?;
    }
    if let Some(bathrooms) = patch.bathrooms {
        validate_count("bathrooms", bathrooms)?;
    }
    Ok(())
}

fn check_featured_policy(policy: FeaturedPolicy, caller: &Caller, requested: bool) -> Result<()> {
    if !requested || caller.role.is_admin() {
        return Ok(());
    }
    match policy {
        FeaturedPolicy::Unrestricted => {
            debug!(
                "Non-admin {} stored a featured listing (policy unrestricted)",
                caller.user_id
            );
            Ok(())
        }
        FeaturedPolicy::AdminOnly => Err(Error::Unauthorized {
            message: "Only administrators can feature a property".to_string(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Row helpers
// ---------------------------------------------------------------------------

async fn find_row<C>(db: &C, id: &str) -> Result<property::Model>
where
    C: ConnectionTrait,
{
    Property::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::property_not_found(id))
}

/// Loads the row and checks the caller is its owner or an admin.
async fn load_authorized(
    db: &DatabaseConnection,
    id: &str,
    caller: &Caller,
    action: &str,
) -> Result<property::Model> {
    let row = find_row(db, id).await?;
    if !caller.may_modify(&row.user_id) {
        warn!(
            "User {} tried to {} property {} owned by {}",
            caller.user_id, action, id, row.user_id
        );
        return Err(Error::Unauthorized {
            message: format!("You can only {action} your own properties"),
        });
    }
    Ok(row)
}

async fn upsert_features<C>(
    db: &C,
    property_id: &str,
    features: &PropertyFeatures,
    now: DateTime<Utc>,
) -> std::result::Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let row = property_feature::ActiveModel {
        property_id: Set(property_id.to_string()),
        has_pool: Set(features.has_pool),
        has_garden: Set(features.has_garden),
        has_garage: Set(features.has_garage),
        has_security_system: Set(features.has_security_system),
        has_air_conditioning: Set(features.has_air_conditioning),
        has_premium_appliances: Set(features.has_premium_appliances),
        created_at: Set(now),
    };

    PropertyFeature::insert(row)
        .on_conflict(
            OnConflict::column(property_feature::Column::PropertyId)
                .update_columns([
                    property_feature::Column::HasPool,
                    property_feature::Column::HasGarden,
                    property_feature::Column::HasGarage,
                    property_feature::Column::HasSecuritySystem,
                    property_feature::Column::HasAirConditioning,
                    property_feature::Column::HasPremiumAppliances,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn insert_images<C>(
    db: &C,
    property_id: &str,
    urls: &[String],
    now: DateTime<Utc>,
) -> std::result::Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if urls.is_empty() {
        return Ok(());
    }

    let rows = urls
        .iter()
        .enumerate()
        .map(|(position, url)| property_image::ActiveModel {
            property_id: Set(property_id.to_string()),
            image_url: Set(url.clone()),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            created_at: Set(now),
            ..Default::default()
        });

    PropertyImage::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Delete-all-then-insert, inside one transaction so a failed insert leaves
/// the previous set in place.
async fn replace_images(
    db: &DatabaseConnection,
    property_id: &str,
    urls: &[String],
    now: DateTime<Utc>,
) -> std::result::Result<(), DbErr> {
    let txn = db.begin().await?;
    let replaced = async {
        PropertyImage::delete_many()
            .filter(property_image::Column::PropertyId.eq(property_id))
            .exec(&txn)
            .await?;
        insert_images(&txn, property_id, urls, now).await
    }
    .await;

    match replaced {
        Ok(()) => txn.commit().await,
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

/// Rolls back a failed create and reports which stage broke.
async fn abort_create(txn: DatabaseTransaction, stage: &'static str, err: DbErr) -> Error {
    error!("Creating property failed while inserting {}: {}", stage, err);
    if let Err(rollback_err) = txn.rollback().await {
        error!("Rollback after failed create also failed: {}", rollback_err);
    }
    Error::PartialWriteFailure {
        stage,
        message: err.to_string(),
    }
}

/// Attaches images and features to each row, preserving row order.
async fn assemble_all<C>(db: &C, rows: Vec<property::Model>) -> Result<Vec<PropertyView>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();

    let mut images_by_property: HashMap<String, Vec<property_image::Model>> = HashMap::new();
    for image in PropertyImage::find()
        .filter(property_image::Column::PropertyId.is_in(ids.clone()))
        .order_by_asc(property_image::Column::Position)
        .order_by_asc(property_image::Column::Id)
        .all(db)
        .await?
    {
        images_by_property
            .entry(image.property_id.clone())
            .or_default()
            .push(image);
    }

    let features_by_property: HashMap<String, property_feature::Model> = PropertyFeature::find()
        .filter(property_feature::Column::PropertyId.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|features| (features.property_id.clone(), features))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let images = images_by_property.remove(&row.id).unwrap_or_default();
            let features = features_by_property.get(&row.id);
            PropertyView::assemble(row, images, features)
        })
        .collect())
}

async fn assemble_one<C>(db: &C, row: property::Model) -> Result<PropertyView>
where
    C: ConnectionTrait,
{
    let images = PropertyImage::find()
        .filter(property_image::Column::PropertyId.eq(row.id.as_str()))
        .order_by_asc(property_image::Column::Position)
        .order_by_asc(property_image::Column::Id)
        .all(db)
        .await?;
    let features = PropertyFeature::find_by_id(row.id.clone()).one(db).await?;
    Ok(PropertyView::assemble(row, images, features.as_ref()))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Retrieves every featured listing, newest first. Public.
pub async fn list_featured(db: &DatabaseConnection) -> Result<Vec<PropertyView>> {
    let rows = Property::find()
        .filter(property::Column::IsFeatured.eq(true))
        .order_by_desc(property::Column::CreatedAt)
        .all(db)
        .await?;
    assemble_all(db, rows).await
}

/// Retrieves listings newest first.
///
/// [`ListScope::Public`] needs no session. [`ListScope::Owned`] needs one:
/// admins get every listing, anyone else only their own.
///
/// # Errors
/// `Unauthenticated` for `Owned` without a session.
#[instrument(skip(db, auth))]
pub async fn list<A>(
    db: &DatabaseConnection,
    auth: &A,
    scope: ListScope,
) -> Result<Vec<PropertyView>>
where
    A: AuthClient + ?Sized,
{
    let mut query = Property::find().order_by_desc(property::Column::CreatedAt);

    if scope == ListScope::Owned {
        let caller = auth.caller().await?;
        if !caller.role.is_admin() {
            query = query.filter(property::Column::UserId.eq(caller.user_id));
        }
    }

    let rows = query.all(db).await?;
    debug!("Listing {} properties for {:?}", rows.len(), scope);
    assemble_all(db, rows).await
}

/// Retrieves one assembled listing. Public.
///
/// # Errors
/// `NotFound` if no listing has this id.
pub async fn get(db: &DatabaseConnection, id: &str) -> Result<PropertyView> {
    let row = find_row(db, id).await?;
    assemble_one(db, row).await
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Creates a listing owned by `caller`, with its features row and images.
///
/// The property, features and image inserts share one transaction. If the
/// features or image insert fails the property row is rolled back too.
///
/// # Errors
/// - `Validation` for a blank title/location or a negative/non-finite number
/// - `Unauthorized` when `policy` forbids a non-admin featured listing
/// - `PartialWriteFailure` when a secondary insert fails
#[instrument(skip(db, input), fields(title = %input.title, caller_id = %caller.user_id))]
pub async fn create(
    db: &DatabaseConnection,
    input: NewProperty,
    caller: &Caller,
    policy: FeaturedPolicy,
) -> Result<PropertyView> {
    validate_new(&input)?;
    check_featured_policy(policy, caller, input.is_featured)?;

    let now = Utc::now();
    let id = uuid::Uuid::new_v4().to_string();

    let row = property::ActiveModel {
        id: Set(id.clone()),
        user_id: Set(caller.user_id.clone()),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description),
        price: Set(input.price),
        location: Set(input.location.trim().to_string()),
        property_type: Set(input.property_type),
        bedrooms: Set(input.bedrooms),
        bathrooms: Set(input.bathrooms),
        area: Set(input.area),
        is_featured: Set(input.is_featured),
        broker_phone: Set(non_empty(input.broker_phone)),
        broker_email: Set(non_empty(input.broker_email)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let txn = db.begin().await?;
    row.insert(&txn).await?;

    if let Err(e) = upsert_features(&txn, &id, &input.features, now).await {
        return Err(abort_create(txn, "features", e).await);
    }
    if let Err(e) = insert_images(&txn, &id, &input.images, now).await {
        return Err(abort_create(txn, "images", e).await);
    }
    txn.commit().await?;

    info!(
        "Created property {} with {} images",
        id,
        input.images.len()
    );
    get(db, &id).await
}

/// Partially updates a listing. Only the owner or an admin may do this.
///
/// Fields present in `patch` are written; the owner never changes. A present
/// `features` is upserted. A present `images` replaces the whole set in the
/// given order; stored files of removed images are not deleted here.
///
/// Failures of the features upsert or the image replacement do not fail the
/// call. They are logged and returned in [`UpdateOutcome::warnings`].
///
/// # Errors
/// `NotFound`, `Unauthorized`, `Validation`, or a database error on the
/// primary row.
#[instrument(skip(db, patch), fields(caller_id = %caller.user_id))]
pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    patch: PropertyPatch,
    caller: &Caller,
    policy: FeaturedPolicy,
) -> Result<UpdateOutcome> {
    let existing = load_authorized(db, id, caller, "update").await?;
    validate_patch(&patch)?;
    if let Some(is_featured) = patch.is_featured {
        check_featured_policy(policy, caller, is_featured)?;
    }

    let now = Utc::now();
    let mut active: property::ActiveModel = existing.into();
    if let Some(title) = patch.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(price) = patch.price {
        active.price = Set(price);
    }
    if let Some(location) = patch.location {
        active.location = Set(location.trim().to_string());
    }
    if let Some(property_type) = patch.property_type {
        active.property_type = Set(property_type);
    }
    if let Some(bedrooms) = patch.bedrooms {
        active.bedrooms = Set(bedrooms);
    }
    if let Some(bathrooms) = patch.bathrooms {
        active.bathrooms = Set(bathrooms);
    }
    if let Some(area) = patch.area {
        active.area = Set(area);
    }
    if let Some(is_featured) = patch.is_featured {
        active.is_featured = Set(is_featured);
    }
    if patch.broker_phone.is_some() {
        active.broker_phone = Set(non_empty(patch.broker_phone));
    }
    if patch.broker_email.is_some() {
        active.broker_email = Set(non_empty(patch.broker_email));
    }
    active.updated_at = Set(now);
    active.update(db).await?;

    let mut warnings = Vec::new();

    if let Some(features) = patch.features {
        if let Err(e) = upsert_features(db, id, &features, now).await {
            warn!("Error updating features of property {}: {}", id, e);
            warnings.push(format!("features not updated: {e}"));
        }
    }

    if let Some(images) = patch.images {
        if let Err(e) = replace_images(db, id, &images, now).await {
            warn!("Error replacing images of property {}: {}", id, e);
            warnings.push(format!("images not updated: {e}"));
        }
    }

    let property = get(db, id).await?;
    if warnings.is_empty() {
        info!("Updated property {}", id);
    } else {
        warn!(
            "Updated property {} with {} warnings",
            id,
            warnings.len()
        );
    }
    Ok(UpdateOutcome { property, warnings })
}

/// Deletes a listing with its image rows and features row. Only the owner
/// or an admin may do this. Stored image files are left alone; see
/// [`delete_with_media`].
///
/// # Errors
/// `NotFound` or `Unauthorized` before anything is deleted.
#[instrument(skip(db), fields(caller_id = %caller.user_id))]
pub async fn delete(db: &DatabaseConnection, id: &str, caller: &Caller) -> Result<()> {
    load_authorized(db, id, caller, "delete").await?;

    let txn = db.begin().await?;
    PropertyImage::delete_many()
        .filter(property_image::Column::PropertyId.eq(id))
        .exec(&txn)
        .await?;
    PropertyFeature::delete_many()
        .filter(property_feature::Column::PropertyId.eq(id))
        .exec(&txn)
        .await?;
    Property::delete_by_id(id.to_string()).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted property {}", id);
    Ok(())
}

/// Deletes the listing's stored image files, then the listing itself.
///
/// A file that cannot be deleted is logged and does not stop the listing
/// from being deleted.
///
/// # Errors
/// `NotFound` or `Unauthorized` before any file is touched.
#[instrument(skip(db, store), fields(caller_id = %caller.user_id))]
pub async fn delete_with_media<S>(
    db: &DatabaseConnection,
    store: &S,
    id: &str,
    caller: &Caller,
) -> Result<()>
where
    S: ImageStore + ?Sized,
{
    let row = load_authorized(db, id, caller, "delete").await?;
    let view = assemble_one(db, row).await?;

    let results = join_all(view.images.iter().map(|url| store.delete(url))).await;
    for (url, result) in view.images.iter().zip(results) {
        if let Err(e) = result {
            error!("Failed to delete stored image {} of property {}: {}", url, id, e);
        }
    }

    delete(db, id, caller).await
}
