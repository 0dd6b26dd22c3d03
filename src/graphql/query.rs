use async_graphql::{Context, Object, Result, ID};

use super::types::{HaustierObject, SuchkriterienInput};
use super::{service, to_graphql_error};
use crate::parser::{Pageable, Suchkriterien};
use crate::resource::parse_id;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Pet with description and photos
    async fn haustier(&self, ctx: &Context<'_>, id: ID) -> Result<HaustierObject> {
        let id = parse_id(&id).map_err(to_graphql_error)?;
        let haustier = service(ctx)?
            .find_by_id(id, true)
            .await
            .map_err(to_graphql_error)?;
        Ok(haustier.into())
    }

    /// First page of pets matching the criteria
    async fn haustiere(
        &self,
        ctx: &Context<'_>,
        suchkriterien: Option<SuchkriterienInput>,
    ) -> Result<Vec<HaustierObject>> {
        let criteria: Suchkriterien = suchkriterien.unwrap_or_default().into();
        let slice = service(ctx)?
            .find(&criteria, &Pageable::default())
            .await
            .map_err(to_graphql_error)?;
        Ok(slice.content.into_iter().map(HaustierObject::from).collect())
    }
}
