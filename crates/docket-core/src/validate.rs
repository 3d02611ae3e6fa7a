//! Field validation for the `New*` input types.
//!
//! Runs at the API boundary, before anything reaches a store. Failures are
//! [`Error::Validation`] with the offending field named, so the HTTP layer
//! can report field-level detail.

use std::collections::HashSet;

use chrono::Utc;

use crate::{
  entity::{NewComment, NewDocument, NewProject, NewTask, NewUser},
  error::{Error, Result},
};

const CONTACT_NUMBER_LEN: usize = 11;
const CONTACT_NUMBER_PREFIX: &str = "03";
const USERNAME_MAX_LEN: usize = 20;

impl NewUser {
  pub fn validate(&self) -> Result<()> {
    if self.email.trim().is_empty() || !self.email.contains('@') {
      return Err(invalid("email", "a valid email address is required"));
    }
    if let Some(username) = &self.username
      && username.chars().count() > USERNAME_MAX_LEN
    {
      return Err(invalid(
        "username",
        format!("must be at most {USERNAME_MAX_LEN} characters"),
      ));
    }
    if let Some(profile) = &self.profile {
      check_contact_number(&profile.contact_number)?;
    }
    Ok(())
  }
}

/// Contact numbers are exactly 11 digits and start with `03`.
fn check_contact_number(number: &str) -> Result<()> {
  if number.len() != CONTACT_NUMBER_LEN
    || !number.chars().all(|c| c.is_ascii_digit())
  {
    return Err(invalid(
      "contact_number",
      format!("must be exactly {CONTACT_NUMBER_LEN} digits"),
    ));
  }
  if !number.starts_with(CONTACT_NUMBER_PREFIX) {
    return Err(invalid(
      "contact_number",
      format!("must start with {CONTACT_NUMBER_PREFIX}"),
    ));
  }
  Ok(())
}

impl NewProject {
  pub fn validate(&self) -> Result<()> {
    non_empty("title", &self.title)?;
    if self.team_members.is_empty() {
      return Err(invalid(
        "team_members",
        "a project needs at least one team member",
      ));
    }
    let mut seen = HashSet::new();
    for member in &self.team_members {
      if !seen.insert(member) {
        return Err(invalid("team_members", format!("duplicate member {member}")));
      }
    }
    if self.start_date >= self.end_date {
      return Err(invalid("end_date", "end date must be after the start date"));
    }
    if self.end_date < Utc::now().date_naive() {
      return Err(invalid("end_date", "end date cannot be in the past"));
    }
    Ok(())
  }
}

impl NewTask {
  pub fn validate(&self) -> Result<()> {
    non_empty("title", &self.title)
  }
}

impl NewDocument {
  pub fn validate(&self) -> Result<()> {
    non_empty("name", &self.name)?;
    if !self.version.is_finite() || self.version <= 0.0 {
      return Err(invalid("version", "version must be a positive number"));
    }
    Ok(())
  }
}

impl NewComment {
  pub fn validate(&self) -> Result<()> {
    non_empty("text", &self.text)
  }
}

pub fn non_empty(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(invalid(field, "must not be empty"));
  }
  Ok(())
}

fn invalid(field: &'static str, message: impl Into<String>) -> Error {
  Error::Validation { field, message: message.into() }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{Duration, NaiveDate, Utc};
  use uuid::Uuid;

  use crate::entity::{
    NewComment, NewDocument, NewProject, NewTask, NewUser, Profile, Role,
    TaskStatus,
  };
  use crate::error::Error;

  fn field_of(err: Error) -> &'static str {
    match err {
      Error::Validation { field, .. } => field,
      other => panic!("expected validation error, got {other}"),
    }
  }

  fn user(email: &str, contact: Option<&str>) -> NewUser {
    NewUser {
      username: Some("alice".into()),
      email:    email.into(),
      profile:  contact.map(|number| Profile {
        role:           Role::Developer,
        contact_number: number.into(),
      }),
    }
  }

  #[test]
  fn user_requires_plausible_email() {
    assert!(user("alice@example.com", None).validate().is_ok());
    assert_eq!(field_of(user("", None).validate().unwrap_err()), "email");
    assert_eq!(
      field_of(user("not-an-email", None).validate().unwrap_err()),
      "email"
    );
  }

  #[test]
  fn contact_number_rules() {
    assert!(user("a@b.c", Some("03001234567")).validate().is_ok());
    // wrong length
    assert_eq!(
      field_of(user("a@b.c", Some("0300123456")).validate().unwrap_err()),
      "contact_number"
    );
    // non-digit
    assert_eq!(
      field_of(user("a@b.c", Some("03001x34567")).validate().unwrap_err()),
      "contact_number"
    );
    // wrong prefix
    assert_eq!(
      field_of(user("a@b.c", Some("13001234567")).validate().unwrap_err()),
      "contact_number"
    );
  }

  fn project(start: NaiveDate, end: NaiveDate, team: Vec<Uuid>) -> NewProject {
    NewProject {
      title:        "Alpha".into(),
      description:  String::new(),
      start_date:   start,
      end_date:     end,
      team_members: team,
    }
  }

  #[test]
  fn project_date_ordering() {
    let today = Utc::now().date_naive();
    let team = vec![Uuid::new_v4()];

    let ok = project(today, today + Duration::days(30), team.clone());
    assert!(ok.validate().is_ok());

    let inverted = project(today + Duration::days(30), today, team.clone());
    assert_eq!(field_of(inverted.validate().unwrap_err()), "end_date");

    let past = project(
      today - Duration::days(60),
      today - Duration::days(30),
      team,
    );
    assert_eq!(field_of(past.validate().unwrap_err()), "end_date");
  }

  #[test]
  fn project_team_must_be_non_empty_and_unique() {
    let today = Utc::now().date_naive();
    let empty = project(today, today + Duration::days(1), vec![]);
    assert_eq!(field_of(empty.validate().unwrap_err()), "team_members");

    let member = Uuid::new_v4();
    let duplicated =
      project(today, today + Duration::days(1), vec![member, member]);
    assert_eq!(field_of(duplicated.validate().unwrap_err()), "team_members");
  }

  #[test]
  fn blank_titles_rejected() {
    let task = NewTask {
      title:       "   ".into(),
      description: String::new(),
      status:      TaskStatus::Open,
      project_id:  Uuid::new_v4(),
      assignee_id: Uuid::new_v4(),
    };
    assert_eq!(field_of(task.validate().unwrap_err()), "title");

    let comment = NewComment {
      text:      String::new(),
      author_id: Uuid::new_v4(),
      task_id:   Uuid::new_v4(),
    };
    assert_eq!(field_of(comment.validate().unwrap_err()), "text");
  }

  #[test]
  fn document_version_must_be_positive() {
    let doc = NewDocument {
      name:        "Roadmap".into(),
      description: String::new(),
      file_name:   None,
      version:     0.0,
      project_id:  Uuid::new_v4(),
    };
    assert_eq!(field_of(doc.validate().unwrap_err()), "version");
  }
}
