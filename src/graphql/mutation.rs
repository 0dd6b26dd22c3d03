use async_graphql::{Context, Object, Result, ID};

use super::types::{CreatePayload, HaustierInput, HaustierUpdateInput, UpdatePayload};
use super::{principal, service, to_graphql_error};
use crate::auth::Role;
use crate::models::HaustierDto;
use crate::resource::parse_id;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create(&self, ctx: &Context<'_>, input: HaustierInput) -> Result<CreatePayload> {
        principal(ctx)
            .require_any(&[Role::Admin, Role::User])
            .map_err(to_graphql_error)?;

        let dto = HaustierDto::from(input);
        let id = service(ctx)?.create(&dto).await.map_err(to_graphql_error)?;
        Ok(CreatePayload { id })
    }

    async fn update(&self, ctx: &Context<'_>, input: HaustierUpdateInput) -> Result<UpdatePayload> {
        principal(ctx)
            .require_any(&[Role::Admin, Role::User])
            .map_err(to_graphql_error)?;

        let id = parse_id(&input.id).map_err(to_graphql_error)?;
        let version = service(ctx)?
            .update(id, &input.to_dto(), &format!("\"{}\"", input.version))
            .await
            .map_err(to_graphql_error)?;
        Ok(UpdatePayload { version })
    }

    /// `false` if no pet with this ID exists
    async fn delete(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        principal(ctx)
            .require_any(&[Role::Admin])
            .map_err(to_graphql_error)?;

        let Ok(id) = id.parse::<i64>() else {
            return Ok(false);
        };
        service(ctx)?.delete(id).await.map_err(to_graphql_error)
    }
}
