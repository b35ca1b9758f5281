mod conversations;
mod profiles;
