//! SeaORM entity models
//!
//! Database entities for units, accounts, employees and publications.

pub mod university;
pub mod faculty;
pub mod department;
pub mod user;
pub mod status;
pub mod degree;
pub mod domain;
pub mod discipline;
pub mod group;
pub mod subgroup;
pub mod position;
pub mod position_subgroup;
pub mod employee;
pub mod employment;
pub mod publisher;
pub mod journal;
pub mod article;
pub mod author;
pub mod contribution_status;
pub mod authorship;

pub use university::{
    Entity as UniversityEntity,
    Model as University,
    ActiveModel as UniversityActiveModel,
    Column as UniversityColumn,
};

pub use faculty::{
    Entity as FacultyEntity,
    Model as Faculty,
    ActiveModel as FacultyActiveModel,
    Column as FacultyColumn,
};

pub use department::{
    Entity as DepartmentEntity,
    Model as Department,
    ActiveModel as DepartmentActiveModel,
    Column as DepartmentColumn,
};

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
    Sex,
};

pub use status::{
    Entity as StatusEntity,
    Model as Status,
    ActiveModel as StatusActiveModel,
    Column as StatusColumn,
};

pub use degree::{
    Entity as DegreeEntity,
    Model as Degree,
    ActiveModel as DegreeActiveModel,
    Column as DegreeColumn,
};

pub use domain::{
    Entity as DomainEntity,
    Model as Domain,
    ActiveModel as DomainActiveModel,
    Column as DomainColumn,
};

pub use discipline::{
    Entity as DisciplineEntity,
    Model as Discipline,
    ActiveModel as DisciplineActiveModel,
    Column as DisciplineColumn,
};

pub use group::{
    Entity as GroupEntity,
    Model as Group,
    ActiveModel as GroupActiveModel,
    Column as GroupColumn,
};

pub use subgroup::{
    Entity as SubgroupEntity,
    Model as Subgroup,
    ActiveModel as SubgroupActiveModel,
    Column as SubgroupColumn,
};

pub use position::{
    Entity as PositionEntity,
    Model as Position,
    ActiveModel as PositionActiveModel,
    Column as PositionColumn,
};

pub use position_subgroup::{
    Entity as PositionSubgroupEntity,
    ActiveModel as PositionSubgroupActiveModel,
    Column as PositionSubgroupColumn,
};

pub use employee::{
    Entity as EmployeeEntity,
    Model as Employee,
    ActiveModel as EmployeeActiveModel,
    Column as EmployeeColumn,
};

pub use employment::{
    Entity as EmploymentEntity,
    Model as Employment,
    ActiveModel as EmploymentActiveModel,
    Column as EmploymentColumn,
};

pub use publisher::{
    Entity as PublisherEntity,
    Model as Publisher,
    ActiveModel as PublisherActiveModel,
    Column as PublisherColumn,
};

pub use journal::{
    Entity as JournalEntity,
    Model as Journal,
    ActiveModel as JournalActiveModel,
    Column as JournalColumn,
};

pub use article::{
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
};

pub use author::{
    Entity as AuthorEntity,
    Model as Author,
    ActiveModel as AuthorActiveModel,
    Column as AuthorColumn,
};

pub use contribution_status::{
    Entity as ContributionStatusEntity,
    Model as ContributionStatus,
    ActiveModel as ContributionStatusActiveModel,
    Column as ContributionStatusColumn,
};

pub use authorship::{
    Entity as AuthorshipEntity,
    Model as Authorship,
    ActiveModel as AuthorshipActiveModel,
    Column as AuthorshipColumn,
    PublicationKind,
    PublicationRef,
};
