use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityName,
    EntityTrait, IdenStatic, IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use scribe_core::error::RepoError;
use scribe_core::ports::BaseRepository;
use scribe_core::query::{FindOptions, Predicate, Record, SortOrder, Value as QueryValue};

/// Field enum of the domain type mapped by `E`.
pub type FieldOf<E> = <<E as Mapped>::Domain as Record>::Field;

/// Binds a SeaORM entity to its domain record.
#[async_trait]
pub trait Mapped: EntityTrait {
    type Domain: Record + From<Self::Model> + Into<Self::ActiveModel>;

    /// Column backing a domain field.
    fn column(field: FieldOf<Self>) -> Self::Column;

    /// Soft-delete marker column.
    fn deleted_at() -> Self::Column;

    /// Hydrate the owning relation on freshly loaded records.
    async fn load_relations(
        _db: &DbConn,
        records: Vec<Self::Domain>,
    ) -> Result<Vec<Self::Domain>, DbErr> {
        Ok(records)
    }
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E: Mapped> PostgresBaseRepository<E> {
    /// AND-combined WHERE clause, hiding soft-deleted rows unless asked not to.
    pub(crate) fn condition(filter: &[Predicate<FieldOf<E>>], with_deleted: bool) -> Condition {
        let mut condition = Condition::all();
        if !with_deleted {
            condition = condition.add(E::deleted_at().is_null());
        }
        filter
            .iter()
            .fold(condition, |c, p| c.add(Self::predicate(p)))
    }

    fn predicate(predicate: &Predicate<FieldOf<E>>) -> SimpleExpr {
        match predicate {
            Predicate::Eq(field, value) => E::column(*field).eq(sql_value(value)),
            Predicate::In(field, values) => E::column(*field).is_in(values.iter().map(sql_value)),
            Predicate::ILike(field, needle) => {
                Expr::col((E::default(), E::column(*field))).ilike(like_pattern(needle))
            }
            Predicate::Has(field, item) => {
                let array = format!(
                    "ANY(\"{}\".\"{}\")",
                    E::default().table_name(),
                    E::column(*field).as_str()
                );
                Expr::val(item.clone()).eq(Expr::cust(array))
            }
        }
    }

    /// SELECT for `options` without pagination.
    pub(crate) fn select(options: &FindOptions<FieldOf<E>>) -> Select<E> {
        E::find().filter(Self::condition(&options.filter, options.with_deleted))
    }

    /// Apply ordering and pagination to a filtered SELECT. Ties on the sort
    /// field fall back to `id` so pages never overlap.
    pub(crate) fn paged(select: Select<E>, options: &FindOptions<FieldOf<E>>) -> Select<E> {
        let (field, order) = options
            .order
            .unwrap_or((<E::Domain as Record>::CREATED_AT, SortOrder::Asc));
        let order = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        select
            .order_by(E::column(field), order)
            .order_by(E::column(<E::Domain as Record>::ID), Order::Asc)
            .offset(options.skip)
            .limit(options.take)
    }

    async fn hydrate(
        &self,
        records: Vec<E::Domain>,
        options: &FindOptions<FieldOf<E>>,
    ) -> Result<Vec<E::Domain>, RepoError> {
        if !options.relations || records.is_empty() {
            return Ok(records);
        }
        E::load_relations(&self.db, records).await.map_err(query_error)
    }
}

#[async_trait]
impl<E> BaseRepository<E::Domain> for PostgresBaseRepository<E>
where
    E: Mapped,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
{
    async fn insert(&self, entity: E::Domain) -> Result<E::Domain, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.insert(&self.db).await.map_err(query_error)?;
        Ok(model.into())
    }

    async fn find_one(
        &self,
        options: &FindOptions<FieldOf<E>>,
    ) -> Result<Option<E::Domain>, RepoError> {
        let model = Self::paged(Self::select(options), options)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        let records = self
            .hydrate(model.into_iter().map(Into::into).collect(), options)
            .await?;
        Ok(records.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions<FieldOf<E>>,
    ) -> Result<(Vec<E::Domain>, u64), RepoError> {
        let select = Self::select(options);
        let total = select.clone().count(&self.db).await.map_err(query_error)?;

        let models = Self::paged(select, options)
            .all(&self.db)
            .await
            .map_err(query_error)?;
        let records = self
            .hydrate(models.into_iter().map(Into::into).collect(), options)
            .await?;

        Ok((records, total))
    }

    async fn update(&self, entity: E::Domain) -> Result<E::Domain, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => RepoError::NotFound,
            other => query_error(other),
        })?;
        Ok(model.into())
    }

    async fn soft_delete(&self, filter: &[Predicate<FieldOf<E>>]) -> Result<u64, RepoError> {
        let result = E::update_many()
            .col_expr(E::deleted_at(), Expr::value(Utc::now().fixed_offset()))
            .filter(Self::condition(filter, false))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(
            entity = <E::Domain as Record>::ENTITY,
            rows = result.rows_affected,
            "Soft-deleted rows"
        );
        Ok(result.rows_affected)
    }

    async fn hard_delete(&self, filter: &[Predicate<FieldOf<E>>]) -> Result<u64, RepoError> {
        let result = E::delete_many()
            .filter(Self::condition(filter, true))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(
            entity = <E::Domain as Record>::ENTITY,
            rows = result.rows_affected,
            "Hard-deleted rows"
        );
        Ok(result.rows_affected)
    }
}

fn sql_value(value: &QueryValue) -> sea_orm::Value {
    match value {
        QueryValue::Uuid(v) => (*v).into(),
        QueryValue::Bool(v) => (*v).into(),
        QueryValue::Text(v) => v.clone().into(),
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn query_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err_str),
        _ if err_str.contains("duplicate") || err_str.contains("unique") => {
            RepoError::Constraint("Entity already exists".to_string())
        }
        _ => RepoError::Query(err_str),
    }
}
