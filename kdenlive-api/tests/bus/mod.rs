mod facade;
mod reply;
