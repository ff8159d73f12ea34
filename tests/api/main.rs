mod access;
mod health_check;
mod helpers;
