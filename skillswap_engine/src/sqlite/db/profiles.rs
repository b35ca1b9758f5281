use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{FromRow, SqliteConnection};
use ssw_common::Credits;

use crate::{
    db_types::{NewProfile, Profile, UserId},
    traits::ProfileApiError,
};

const PROFILE_COLUMNS: &str = "id, display_name, email, photo_url, location, bio, college, degree, skills_to_teach, \
                               skills_to_learn, certificates, credits, created_at, last_updated";

/// A profile as stored. The skill sets and certificates are JSON text columns.
#[derive(Debug, Clone, FromRow)]
struct ProfileRow {
    id: UserId,
    display_name: String,
    email: Option<String>,
    photo_url: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    college: Option<String>,
    degree: Option<String>,
    skills_to_teach: String,
    skills_to_learn: String,
    certificates: String,
    credits: Credits,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

fn from_json<T: DeserializeOwned>(id: &UserId, column: &str, value: &str) -> Result<T, ProfileApiError> {
    serde_json::from_str(value)
        .map_err(|e| ProfileApiError::CorruptRecord(format!("Profile {id} has an invalid {column} column. {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ProfileApiError> {
    serde_json::to_string(value).map_err(|e| ProfileApiError::CorruptRecord(e.to_string()))
}

impl TryFrom<ProfileRow> for Profile {
    type Error = ProfileApiError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let skills_to_teach = from_json(&row.id, "skills_to_teach", &row.skills_to_teach)?;
        let skills_to_learn = from_json(&row.id, "skills_to_learn", &row.skills_to_learn)?;
        let certificates = from_json(&row.id, "certificates", &row.certificates)?;
        Ok(Profile {
            id: row.id,
            display_name: row.display_name,
            email: row.email,
            photo_url: row.photo_url,
            location: row.location,
            bio: row.bio,
            college: row.college,
            degree: row.degree,
            skills_to_teach,
            skills_to_learn,
            certificates,
            credits: row.credits,
            created_at: row.created_at,
            last_updated: row.last_updated,
        })
    }
}

pub async fn fetch_profile(id: &UserId, conn: &mut SqliteConnection) -> Result<Option<Profile>, ProfileApiError> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
    let row = sqlx::query_as::<_, ProfileRow>(&sql).bind(id).fetch_optional(conn).await?;
    row.map(Profile::try_from).transpose()
}

/// All profiles except `id`, in the order they were created.
pub async fn fetch_profiles_except(id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Profile>, ProfileApiError> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id <> $1 ORDER BY rowid ASC");
    let rows = sqlx::query_as::<_, ProfileRow>(&sql).bind(id).fetch_all(conn).await?;
    trace!("🗃️ Fetched {} profiles other than {id}", rows.len());
    rows.into_iter().map(Profile::try_from).collect()
}

/// Inserts a new profile with the signup defaults. Returns `None` if a profile with this id already exists.
pub async fn insert_new_profile(
    profile: NewProfile,
    conn: &mut SqliteConnection,
) -> Result<Option<Profile>, ProfileApiError> {
    let profile = Profile::new_at_signup(profile);
    let inserted = write_profile(&profile, false, conn).await?;
    if inserted {
        debug!("🗃️ Profile for {} created", profile.id);
        Ok(Some(profile))
    } else {
        Ok(None)
    }
}

/// Writes the full profile record.
///
/// If `overwrite` is false and a record with the same id exists, nothing is written and `false` is returned.
pub async fn write_profile(
    profile: &Profile,
    overwrite: bool,
    conn: &mut SqliteConnection,
) -> Result<bool, ProfileApiError> {
    let on_conflict = if overwrite {
        "ON CONFLICT (id) DO UPDATE SET display_name = excluded.display_name, email = excluded.email, photo_url = \
         excluded.photo_url, location = excluded.location, bio = excluded.bio, college = excluded.college, degree = \
         excluded.degree, skills_to_teach = excluded.skills_to_teach, skills_to_learn = excluded.skills_to_learn, \
         certificates = excluded.certificates, credits = excluded.credits, last_updated = excluded.last_updated"
    } else {
        "ON CONFLICT (id) DO NOTHING"
    };
    let sql = format!(
        "INSERT INTO profiles ({PROFILE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         {on_conflict}"
    );
    let result = sqlx::query(&sql)
        .bind(&profile.id)
        .bind(&profile.display_name)
        .bind(&profile.email)
        .bind(&profile.photo_url)
        .bind(&profile.location)
        .bind(&profile.bio)
        .bind(&profile.college)
        .bind(&profile.degree)
        .bind(to_json(&profile.skills_to_teach)?)
        .bind(to_json(&profile.skills_to_learn)?)
        .bind(to_json(&profile.certificates)?)
        .bind(profile.credits)
        .bind(profile.created_at)
        .bind(profile.last_updated)
        .execute(conn)
        .await?;
    trace!("🗃️ Profile {} written ({} rows affected)", profile.id, result.rows_affected());
    Ok(result.rows_affected() > 0)
}
