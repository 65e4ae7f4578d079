//! Cross-service runs: units, employees, journals, articles and authorships
//! saved through the public services and read back through the repository.

use attainments_common::db::models::{ArticleEntity, PublicationRef};
use attainments_common::db::{DbPool, Repository};
use attainments_common::services::accounts::{self, NewUser};
use attainments_common::services::authorship::{self, AuthorForm, AuthorshipForm};
use attainments_common::services::employees::{self, EmployeeForm, EmploymentForm, NamedForm};
use attainments_common::services::scoring::{self, ArticleForm, JournalForm};
use attainments_common::services::units::{self, DepartmentForm, FacultyForm, UniversityForm};
use rust_decimal::Decimal;

#[tokio::test]
async fn test_article_lifecycle_across_services() {
    let pool = DbPool::in_memory().await.unwrap();
    let db = pool.write();
    let repo = Repository::new(pool.clone());

    let journal = scoring::save_journal(
        db,
        JournalForm {
            title: "Acta Physica".to_string(),
            impact_factor: Decimal::new(25, 1),
            points: 20,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let article = scoring::save_article(
        db,
        ArticleForm {
            journal_id: journal.id,
            title: "On lattices".to_string(),
            year: 2021,
            first_page: "1".to_string(),
            last_page: "12".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // An author backed by an employee takes the user's short name
    let user = accounts::create_user(
        db,
        NewUser {
            first_name: "Anna".to_string(),
            last_name: "Nowak".to_string(),
            ..NewUser::new("anowak", "correct horse")
        },
    )
    .await
    .unwrap();
    let status = employees::save_status(
        db,
        NamedForm {
            name: "Employed".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let employee = employees::save_employee(db, EmployeeForm::new(user.id, "anna-nowak", status.id))
        .await
        .unwrap();

    let nowak = authorship::save_author(
        db,
        AuthorForm {
            employee_id: Some(employee.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(nowak.alias, "Nowak A.");

    let kowalski = authorship::save_author(
        db,
        AuthorForm {
            alias: "Kowalski J.".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let target = PublicationRef::Article(article.id);
    authorship::save_authorship(
        db,
        AuthorshipForm {
            order: 2,
            ..AuthorshipForm::new(kowalski.id, target)
        },
    )
    .await
    .unwrap();
    let first = authorship::save_authorship(db, AuthorshipForm::new(nowak.id, target))
        .await
        .unwrap();

    let article = repo
        .get::<ArticleEntity>(article.id, "article")
        .await
        .unwrap();
    assert_eq!(article.authors, "Nowak A., Kowalski J.");
    assert_eq!(article.author_count, 2);
    assert_eq!(article.impact_factor, Decimal::new(25, 1));

    // Journal re-scoring and author aggregation both hold after a journal edit
    scoring::save_journal(
        db,
        JournalForm {
            id: Some(journal.id),
            title: "Acta Physica".to_string(),
            impact_factor: Decimal::new(30, 1),
            points: 40,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let article = repo
        .get::<ArticleEntity>(article.id, "article")
        .await
        .unwrap();
    assert_eq!(article.impact_factor, Decimal::new(30, 1));
    assert_eq!(article.points, 40);
    assert_eq!(article.authors, "Nowak A., Kowalski J.");

    let journals = repo.journal_summaries().await.unwrap();
    assert_eq!(journals[0].article_count, 1);

    let authors = repo.author_summaries().await.unwrap();
    assert!(authors.iter().all(|a| a.authorship_count == 1));

    // Removing the first author shifts the summary
    assert!(authorship::delete_authorship(db, first.id).await.unwrap());
    let article = repo
        .get::<ArticleEntity>(article.id, "article")
        .await
        .unwrap();
    assert_eq!(article.authors, "Kowalski J.");
    assert_eq!(article.author_count, 1);

    // Deleting the journal takes its article and the article's rows with it
    assert!(scoring::delete_journal(db, journal.id).await.unwrap());
    assert!(repo.article_authorships(article.id).await.is_err());
    let authors = repo.author_summaries().await.unwrap();
    assert!(authors.iter().all(|a| a.authorship_count == 0));
}

#[tokio::test]
async fn test_unit_counts_follow_employments() {
    let pool = DbPool::in_memory().await.unwrap();
    let db = pool.write();
    let repo = Repository::new(pool.clone());

    let university = units::save_university(
        db,
        UniversityForm {
            name: "University of Silesia".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let faculty = units::save_faculty(
        db,
        FacultyForm {
            university_id: university.id,
            name: "Science".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let mut departments = Vec::new();
    for name in ["Physics", "Chemistry"] {
        departments.push(
            units::save_department(
                db,
                DepartmentForm {
                    faculty_id: faculty.id,
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap(),
        );
    }

    let status = employees::save_status(
        db,
        NamedForm {
            name: "Employed".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let user = accounts::create_user(db, NewUser::new("anowak", "correct horse"))
        .await
        .unwrap();
    let employee = employees::save_employee(db, EmployeeForm::new(user.id, "anowak", status.id))
        .await
        .unwrap();

    // One employee in both departments still counts once per university
    for department in &departments {
        employees::save_employment(
            db,
            EmploymentForm {
                employee_id: employee.id,
                department_id: Some(department.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let summary = &repo.university_summaries().await.unwrap()[0];
    assert_eq!(summary.faculty_count, 1);
    assert_eq!(summary.department_count, 2);
    assert_eq!(summary.employee_count, 1);

    let faculties = repo.faculty_summaries().await.unwrap();
    assert_eq!(faculties[0].department_count, 2);
    assert_eq!(faculties[0].employee_count, 1);

    let departments = repo.department_summaries().await.unwrap();
    assert!(departments.iter().all(|d| d.employee_count == 1));

    assert_eq!(repo.employee_employments(employee.id).await.unwrap().len(), 2);
}
