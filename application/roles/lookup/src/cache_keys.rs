use redis_connection::cache_key;

cache_key!(UserRoleNamesCacheKey::<Vec<String>> => "role:user:{}"[user_id: i64]);
