use regform::form::FormModel;

#[derive(FormModel)]
struct Credentials(String, String);

fn main() {}
