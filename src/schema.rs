table! {
    comments (id) {
        id -> Int4,
        content -> Varchar,
        post_id -> Int4,
        user_id -> Int4,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
        blocked -> Bool,
    }
}

table! {
    posts (id) {
        id -> Int4,
        title -> Varchar,
        content -> Varchar,
        user_id -> Int4,
        blocked -> Bool,
    }
}

table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        hashed_password -> Varchar,
    }
}

joinable!(comments -> posts (post_id));
joinable!(comments -> users (user_id));
joinable!(posts -> users (user_id));

allow_tables_to_appear_in_same_query!(
    comments,
    posts,
    users,
);
