use crate::schema::documents;

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentRow {
  pub name: String,
  pub body: String,
  pub revision: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow<'a> {
  pub name: &'a str,
  pub body: &'a str,
  pub revision: i64,
}
