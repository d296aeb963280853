use regform::form::FormModel;

#[derive(FormModel)]
struct DraftForm<T> {
    username: T,
}

fn main() {}
