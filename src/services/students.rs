//! Student Registry
//!
//! 학생 CRUD. 이메일 유니크는 스토어 제약으로 보장되고,
//! 위반 시 `From<sqlx::Error>`가 Conflict로 변환함.

use std::sync::Arc;

use serde::Deserialize;

use crate::db::{students, Database, NewStudent, Student};
use crate::error::{LibraryError, LibraryResult};
use crate::types::{parse_date, parse_optional_date, require_text, Patch};

/// 학생 등록 요청
#[derive(Debug, Default, Deserialize)]
pub struct CreateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `YYYY-MM-DD`
    pub birth_date: Option<String>,
}

/// 학생 부분 업데이트 요청
#[derive(Debug, Default, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub birth_date: Patch<String>,
}

impl StudentPatch {
    fn is_empty(&self) -> bool {
        self.first_name.is_absent()
            && self.last_name.is_absent()
            && self.email.is_absent()
            && self.birth_date.is_absent()
    }
}

/// 이메일 정규화 + 최소 형식 검증 (소문자, `@` 포함)
fn normalize_email(value: Option<String>) -> LibraryResult<String> {
    let email = require_text("email", value)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(LibraryError::invalid("email is not a valid address")),
    }
}

fn required_patch(field: &str, patch: Patch<String>, target: &mut String) -> LibraryResult<()> {
    match patch {
        Patch::Absent => Ok(()),
        Patch::Null => Err(LibraryError::invalid(format!("{} is required", field))),
        Patch::Value(v) => {
            *target = require_text(field, Some(v))?;
            Ok(())
        }
    }
}

pub struct StudentRegistry {
    db: Arc<Database>,
}

impl StudentRegistry {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list_students(&self) -> LibraryResult<Vec<Student>> {
        Ok(students::list(self.db.pool()).await?)
    }

    pub async fn get_student(&self, id: i64) -> LibraryResult<Student> {
        students::find(self.db.pool(), id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Student"))
    }

    pub async fn create_student(&self, input: CreateStudent) -> LibraryResult<Student> {
        let new_student = NewStudent {
            first_name: require_text("first_name", input.first_name)?,
            last_name: require_text("last_name", input.last_name)?,
            email: normalize_email(input.email)?,
            birth_date: parse_optional_date(input.birth_date.as_deref())?,
        };

        let student = students::insert(self.db.pool(), &new_student).await?;
        tracing::info!(student_id = student.id, "Student registered");
        Ok(student)
    }

    pub async fn update_student(&self, id: i64, patch: StudentPatch) -> LibraryResult<Student> {
        let mut student = self.get_student(id).await?;

        if patch.is_empty() {
            return Err(LibraryError::invalid("No data provided"));
        }

        required_patch("first_name", patch.first_name, &mut student.first_name)?;
        required_patch("last_name", patch.last_name, &mut student.last_name)?;
        match patch.email {
            Patch::Absent => {}
            Patch::Null => return Err(LibraryError::invalid("email is required")),
            Patch::Value(email) => student.email = normalize_email(Some(email))?,
        }
        match patch.birth_date {
            Patch::Absent => {}
            Patch::Null => student.birth_date = None,
            Patch::Value(date) => student.birth_date = Some(parse_date(&date)?),
        }

        if students::update(self.db.pool(), &student).await? == 0 {
            return Err(LibraryError::not_found("Student"));
        }

        tracing::info!(student_id = student.id, "Student updated");
        Ok(student)
    }

    /// 학생 삭제
    ///
    /// 미반납 도서가 있으면 Conflict, 반납 완료 기록은 CASCADE로 함께 삭제
    pub async fn delete_student(&self, id: i64) -> LibraryResult<()> {
        if students::delete_if_no_active_borrows(self.db.pool(), id).await? > 0 {
            tracing::info!(student_id = id, "Student deleted");
            return Ok(());
        }

        self.get_student(id).await?;
        tracing::warn!(student_id = id, "Rejected delete of student with active borrows");
        Err(LibraryError::conflict("Student has borrowed books that are not returned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::migrated_db;
    use tokio_test::assert_ok;

    fn alice() -> CreateStudent {
        CreateStudent {
            first_name: Some("Alice".into()),
            last_name: Some("Martin".into()),
            email: Some("Alice@Example.com".into()),
            birth_date: Some("2004-02-29".into()),
        }
    }

    #[tokio::test]
    async fn test_create_student_normalizes_email() {
        let registry = StudentRegistry::new(migrated_db().await);

        let student = assert_ok!(registry.create_student(alice()).await);
        assert_eq!(student.email, "alice@example.com");
        assert_eq!(registry.get_student(student.id).await.unwrap(), student);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let registry = StudentRegistry::new(migrated_db().await);
        registry.create_student(alice()).await.unwrap();

        let again = CreateStudent {
            first_name: Some("Other".into()),
            email: Some("alice@example.com".into()),
            ..alice()
        };
        assert!(matches!(
            registry.create_student(again).await,
            Err(LibraryError::Conflict(_))
        ));
        assert_eq!(registry.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_student_validation() {
        let registry = StudentRegistry::new(migrated_db().await);

        let no_email = CreateStudent { email: None, ..alice() };
        assert!(matches!(registry.create_student(no_email).await, Err(LibraryError::InvalidInput(_))));

        let bad_email = CreateStudent { email: Some("not-an-email".into()), ..alice() };
        assert!(matches!(registry.create_student(bad_email).await, Err(LibraryError::InvalidInput(_))));

        let bad_date = CreateStudent { birth_date: Some("2003-02-29".into()), ..alice() };
        assert!(matches!(registry.create_student(bad_date).await, Err(LibraryError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_student() {
        let registry = StudentRegistry::new(migrated_db().await);
        let student = registry.create_student(alice()).await.unwrap();

        let patch = StudentPatch {
            last_name: Patch::Value("Dupont".into()),
            birth_date: Patch::Null,
            ..Default::default()
        };
        let updated = assert_ok!(registry.update_student(student.id, patch).await);
        assert_eq!(updated.last_name, "Dupont");
        assert_eq!(updated.first_name, "Alice");
        assert_eq!(updated.birth_date, None);

        assert_eq!(
            registry.update_student(student.id, StudentPatch::default()).await,
            Err(LibraryError::invalid("No data provided"))
        );
    }

    #[tokio::test]
    async fn test_update_email_to_taken_address_is_conflict() {
        let registry = StudentRegistry::new(migrated_db().await);
        registry.create_student(alice()).await.unwrap();
        let bob = registry
            .create_student(CreateStudent {
                first_name: Some("Bob".into()),
                email: Some("bob@example.com".into()),
                ..alice()
            })
            .await
            .unwrap();

        let patch = StudentPatch { email: Patch::Value("alice@example.com".into()), ..Default::default() };
        assert!(matches!(
            registry.update_student(bob.id, patch).await,
            Err(LibraryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_student() {
        let registry = StudentRegistry::new(migrated_db().await);
        let student = registry.create_student(alice()).await.unwrap();

        assert_ok!(registry.delete_student(student.id).await);
        assert_eq!(
            registry.delete_student(student.id).await,
            Err(LibraryError::not_found("Student"))
        );
    }
}
