use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct StoredMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub insights: Vec<Option<String>>,
    pub recipient_name: String,
    pub relationship: String,
    pub intent: String,
    pub tone: String,
    pub format: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage<'a> {
    pub user_id: Uuid,
    pub content: &'a str,
    pub insights: &'a [Option<String>],
    pub recipient_name: &'a str,
    pub relationship: &'a str,
    pub intent: &'a str,
    pub tone: &'a str,
    pub format: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::connections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Connection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub relationship: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::connections)]
pub struct NewConnection<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub relationship: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::usage_counters)]
pub struct NewUsageCounter {
    pub user_id: Uuid,
    pub day: NaiveDate,
    pub count: i32,
}
