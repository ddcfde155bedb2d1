use catalog_commands::BannerInput;
use catalog_models::Banner;
use dao_utils::query_helpers::PgParam;
use tokio_postgres::Row;

use crate::entity::SqlEntity;

impl SqlEntity for Banner {
    type Create = BannerInput;
    type Update = BannerInput;

    const COLUMNS: &'static str = "id, name, start_date, end_date, start_time, end_time, \
                                   is_active, created_at, updated_at, deleted_at";
    const INSERT: &'static str = "INSERT INTO banners (name, start_date, end_date, start_time, \
                                  end_time, is_active) VALUES ($1, $2, $3, $4, $5, $6) \
                                  RETURNING id, name, start_date, end_date, start_time, \
                                  end_time, is_active, created_at, updated_at, deleted_at";
    const SEARCH_COLUMN: &'static str = "name";
    const TABLE: &'static str = "banners";
    const UPDATE: &'static str = "UPDATE banners SET name = $2, start_date = $3, end_date = $4, \
                                  start_time = $5, end_time = $6, is_active = $7, updated_at \
                                  = NOW() WHERE id = $1 RETURNING id, name, start_date, \
                                  end_date, start_time, end_time, is_active, created_at, \
                                  updated_at, deleted_at";

    fn from_row(row: &Row) -> Self {
        Banner {
            id: row.get("id"),
            name: row.get("name"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    fn create_params(req: &BannerInput) -> Vec<&PgParam> { banner_params(req) }

    fn update_params(req: &BannerInput) -> Vec<&PgParam> { banner_params(req) }
}

fn banner_params(req: &BannerInput) -> Vec<&PgParam> {
    vec![
        &req.name as &PgParam,
        &req.start_date,
        &req.end_date,
        &req.start_time,
        &req.end_time,
        &req.is_active,
    ]
}
