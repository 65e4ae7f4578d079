//! Schema creation from the entity definitions
//!
//! Tables are created in foreign-key dependency order so the same sequence
//! works on Postgres, which checks referenced tables at creation time.

use crate::db::models::*;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, EntityTrait, Schema};
use tracing::{debug, info};

/// Create every table that does not exist yet
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create(db, UniversityEntity).await?;
    create(db, FacultyEntity).await?;
    create(db, DepartmentEntity).await?;
    create(db, UserEntity).await?;
    create(db, StatusEntity).await?;
    create(db, DegreeEntity).await?;
    create(db, DomainEntity).await?;
    create(db, DisciplineEntity).await?;
    create(db, GroupEntity).await?;
    create(db, SubgroupEntity).await?;
    create(db, PositionEntity).await?;
    create(db, PositionSubgroupEntity).await?;
    create(db, EmployeeEntity).await?;
    create(db, EmploymentEntity).await?;
    create(db, PublisherEntity).await?;
    create(db, JournalEntity).await?;
    create(db, ArticleEntity).await?;
    create(db, AuthorEntity).await?;
    create(db, ContributionStatusEntity).await?;
    create(db, AuthorshipEntity).await?;

    info!("Database schema ready");
    Ok(())
}

async fn create<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    debug!(table = entity.table_name(), "Creating table");

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;

    Ok(())
}
