//! Feed query builder using SeaQuery.
//!
//! Renders the whole feed pipeline as one PostgreSQL statement:
//! author/tag filters, a LEFT JOIN on grouped comment counts, the derived
//! vote difference, ordering, and optional LIMIT/OFFSET.

use sea_query::{
    Alias, Asterisk, Expr, ExprTrait, Func, Iden, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr,
};

use super::types::{CommentJoin, FeedQuery, SortMode};

#[derive(Iden, Clone, Copy)]
enum Post {
    Table,
    Id,
    Title,
    AuthorEmail,
    Tag,
    UpVote,
    DownVote,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Comment {
    Table,
    PostId,
    PostTitle,
}

const COUNTS_ALIAS: &str = "comment_counts";
const JOIN_KEY: &str = "join_key";
const COMMENT_COUNT: &str = "comment_count";
const VOTE_DIFFERENCE: &str = "vote_difference";

/// Query builder for feed listings.
pub struct FeedQueryBuilder {
    query: FeedQuery,
    join: CommentJoin,
}

impl FeedQueryBuilder {
    /// Create a builder for one listing.
    pub fn new(query: FeedQuery, join: CommentJoin) -> Self {
        Self { query, join }
    }

    /// Build the feed SELECT.
    pub fn build(&self) -> String {
        let mut select = Query::select();

        select
            .columns([
                (Post::Table, Post::Id),
                (Post::Table, Post::Title),
                (Post::Table, Post::AuthorEmail),
                (Post::Table, Post::Tag),
                (Post::Table, Post::UpVote),
                (Post::Table, Post::DownVote),
                (Post::Table, Post::CreatedAt),
            ])
            .from(Post::Table);

        // Filters come first; the join and ordering only see matching posts
        self.add_filters(&mut select);

        self.add_comment_counts(&mut select);

        select.expr_as(vote_difference_expr(), Alias::new(VOTE_DIFFERENCE));

        self.add_sort(&mut select);

        if let Some((offset, limit)) = self.query.pagination() {
            select.limit(limit);
            select.offset(offset);
        }

        select.to_string(PostgresQueryBuilder)
    }

    /// Build a COUNT over the filtered posts.
    pub fn build_count(&self) -> String {
        let mut select = Query::select();

        select
            .expr(Expr::col(Asterisk).count())
            .from(Post::Table);

        self.add_filters(&mut select);

        select.to_string(PostgresQueryBuilder)
    }

    /// Add author equality and tag search conditions.
    fn add_filters(&self, select: &mut SelectStatement) {
        if let Some(email) = self.query.author_filter() {
            select.and_where(Expr::col((Post::Table, Post::AuthorEmail)).eq(email));
        }

        if let Some(term) = self.query.search_term() {
            let pattern = format!("%{}%", escape_like_wildcards(term));
            select.and_where(Expr::cust_with_values(
                r#""post"."tag" ILIKE $1"#,
                [pattern],
            ));
        }
    }

    /// LEFT JOIN a grouped comment count keyed by the configured join column.
    ///
    /// Posts without comments keep a row and report zero.
    fn add_comment_counts(&self, select: &mut SelectStatement) {
        let (comment_key, post_key) = match self.join {
            CommentJoin::Title => (Comment::PostTitle, Post::Title),
            CommentJoin::Id => (Comment::PostId, Post::Id),
        };

        let counts = Query::select()
            .expr_as(Expr::col(comment_key), Alias::new(JOIN_KEY))
            .expr_as(Expr::col(Asterisk).count(), Alias::new(COMMENT_COUNT))
            .from(Comment::Table)
            .group_by_col(comment_key)
            .to_owned();

        select.join_subquery(
            sea_query::JoinType::LeftJoin,
            counts,
            Alias::new(COUNTS_ALIAS),
            Expr::col((Post::Table, post_key))
                .equals((Alias::new(COUNTS_ALIAS), Alias::new(JOIN_KEY))),
        );

        select.expr_as(
            Func::coalesce([
                SimpleExpr::from(Expr::col((
                    Alias::new(COUNTS_ALIAS),
                    Alias::new(COMMENT_COUNT),
                ))),
                SimpleExpr::from(Expr::val(0i64)),
            ]),
            Alias::new(COMMENT_COUNT),
        );
    }

    /// Primary key from the sort mode, then `id` ascending so equal keys keep
    /// insertion order (ids are UUIDv7).
    fn add_sort(&self, select: &mut SelectStatement) {
        match self.query.sort {
            SortMode::Popular => {
                select.order_by_expr(vote_difference_expr(), Order::Desc);
            }
            SortMode::New => {
                select.order_by((Post::Table, Post::CreatedAt), Order::Desc);
            }
        }
        select.order_by((Post::Table, Post::Id), Order::Asc);
    }
}

fn vote_difference_expr() -> SimpleExpr {
    Expr::col((Post::Table, Post::UpVote)).sub(Expr::col((Post::Table, Post::DownVote)))
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
