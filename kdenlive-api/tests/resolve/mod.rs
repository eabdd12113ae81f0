mod media_pool;
mod project;
mod timeline;
