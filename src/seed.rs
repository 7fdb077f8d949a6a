use chrono::Utc;
use entity::{perfume, user};
use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, Set};

use crate::auth::oauth2::AuthProvider;
use crate::auth::password::hash_password;
use crate::auth::roles::{decode_roles, encode_roles, Role};
use crate::db::queries;
use crate::error::AppError;
use crate::services::perfumes::{add_perfume, NewPerfume};

/// Result of a bootstrap/seed operation.
#[derive(Debug)]
pub struct SeedResult {
    /// What happened to the user: "created", "promoted", or "already_admin".
    pub user_action: String,
    /// Catalog entries inserted; zero when the catalog already had stock.
    pub perfumes_added: usize,
}

// (title, perfumer, year, country, gender, top, middle, base, price, volume, type)
type StarterPerfume = (
    &'static str,
    &'static str,
    i32,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i32,
    &'static str,
    &'static str,
);

const STARTER_CATALOG: &[StarterPerfume] = &[
    (
        "Aventus",
        "Creed",
        2010,
        "France",
        "male",
        "Pineapple, Bergamot, Black Currant",
        "Birch, Patchouli, Rose",
        "Musk, Oakmoss, Ambergris",
        305,
        "100",
        "Eau de Parfum",
    ),
    (
        "Chanel No 5",
        "Chanel",
        1921,
        "France",
        "female",
        "Aldehydes, Ylang-Ylang, Neroli",
        "Iris, Jasmine, Rose",
        "Sandalwood, Vanilla, Vetiver",
        142,
        "100",
        "Eau de Parfum",
    ),
    (
        "Terre d'Hermes",
        "Hermes",
        2006,
        "France",
        "male",
        "Orange, Grapefruit",
        "Pepper, Pelargonium",
        "Vetiver, Cedar, Benzoin",
        110,
        "100",
        "Eau de Toilette",
    ),
    (
        "Black Opium",
        "Yves Saint Laurent",
        2014,
        "France",
        "female",
        "Pear, Pink Pepper, Orange Blossom",
        "Coffee, Jasmine",
        "Vanilla, Patchouli, Cedar",
        126,
        "90",
        "Eau de Parfum",
    ),
];

/// Bootstrap the admin account and the starter catalog.
///
/// - Creates or promotes the admin user.
/// - `admin_password` is required when the user doesn't exist yet.
/// - Inserts the starter perfumes only into an empty catalog.
pub async fn bootstrap(
    db: &DatabaseConnection,
    admin_email: &str,
    admin_password: Option<&str>,
) -> Result<SeedResult, AppError> {
    let user_action = match queries::users::find_by_email(db, admin_email).await? {
        Some(user) => {
            let mut roles = decode_roles(&user.roles)?;
            if roles.first() == Some(&Role::Admin) {
                "already_admin".to_string()
            } else {
                // The first role is the one tokens carry.
                roles.retain(|r| *r != Role::Admin);
                roles.insert(0, Role::Admin);

                let mut active = user.into_active_model();
                active.roles = Set(encode_roles(&roles));
                active.active = Set(true);
                active.updated_at = Set(Utc::now().naive_utc());
                queries::users::update(db, active).await?;
                "promoted".to_string()
            }
        }
        None => {
            let password = admin_password.ok_or_else(|| {
                AppError::BadRequest(
                    "Password is required when creating a new admin user. Usage: cargo run -- seed <email> <password>".to_string(),
                )
            })?;

            let now = Utc::now().naive_utc();
            let model = user::ActiveModel {
                email: Set(admin_email.to_string()),
                first_name: Set(Some("Admin".to_string())),
                password: Set(Some(hash_password(password)?)),
                roles: Set(encode_roles(&[Role::Admin, Role::User])),
                provider: Set(AuthProvider::Local.to_string()),
                active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            queries::users::insert(db, model).await?;
            "created".to_string()
        }
    };

    let mut perfumes_added = 0;
    if perfume::Entity::find().count(db).await? == 0 {
        for &(title, perfumer, year, country, gender, top, middle, base, price, volume, kind) in
            STARTER_CATALOG
        {
            add_perfume(
                db,
                NewPerfume {
                    perfume_title: title.to_string(),
                    perfumer: perfumer.to_string(),
                    year: Some(year),
                    country: Some(country.to_string()),
                    perfume_gender: gender.to_string(),
                    fragrance_top_notes: Some(top.to_string()),
                    fragrance_middle_notes: Some(middle.to_string()),
                    fragrance_base_notes: Some(base.to_string()),
                    price,
                    volume: Some(volume.to_string()),
                    perfume_type: Some(kind.to_string()),
                },
            )
            .await?;
            perfumes_added += 1;
        }
    }

    tracing::info!(email = admin_email, %user_action, perfumes_added, "bootstrap finished");
    Ok(SeedResult {
        user_action,
        perfumes_added,
    })
}
